use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Requested,
    Accepted,
    Declined,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Requested => "requested",
            InterviewStatus::Accepted => "accepted",
            InterviewStatus::Declined => "declined",
        }
    }
}

impl FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(InterviewStatus::Requested),
            "accepted" => Ok(InterviewStatus::Accepted),
            "declined" => Ok(InterviewStatus::Declined),
            other => Err(format!("unknown interview status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: i32,
    pub job_id: i32,
    pub applicant_id: String,
    pub recruiter_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: InterviewStatus,
}

#[derive(Debug, Clone)]
pub struct NewInterview {
    pub job_id: i32,
    pub applicant_id: String,
    pub recruiter_id: String,
    pub scheduled_at: DateTime<Utc>,
}
