use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SkillSet;

/// A job posting. Jobs are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub skills: SkillSet,
    pub company_id: i32,
    pub posted_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub skills: SkillSet,
    pub company_id: i32,
    pub posted_by: String,
}
