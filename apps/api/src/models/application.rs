use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state of an application. The well-known states get variants; any
/// other label a recruiter records is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Other(label) => label,
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "pending" => ApplicationStatus::Pending,
            "accepted" => ApplicationStatus::Accepted,
            "rejected" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Other(label),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i32,
    pub job_id: i32,
    pub applicant_id: String,
    pub resume: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    /// Filled by listing queries that join the job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: i32,
    pub applicant_id: String,
    pub resume: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_map_to_variants() {
        assert_eq!(
            ApplicationStatus::from("rejected".to_string()),
            ApplicationStatus::Rejected
        );
    }

    #[test]
    fn test_unknown_label_is_preserved() {
        let status = ApplicationStatus::from("shortlisted".to_string());
        assert_eq!(status, ApplicationStatus::Other("shortlisted".to_string()));
        assert_eq!(status.as_str(), "shortlisted");
    }
}
