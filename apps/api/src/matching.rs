//! Skill matching shared by job recommendations and applicant search.
//!
//! `required` is the set a candidate is measured against (a job's skills, or a
//! recruiter's search query); `offered` is what the candidate brings (an
//! applicant's skills). Comparison is exact and case-sensitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::SkillSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// At least one shared skill.
    #[default]
    Any,
    /// Every required skill is offered.
    All,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(MatchMode::Any),
            "all" => Ok(MatchMode::All),
            other => Err(format!("unknown skill match mode '{other}' (expected any|all)")),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Any => f.write_str("any"),
            MatchMode::All => f.write_str("all"),
        }
    }
}

/// An empty `required` set never matches, in either mode.
pub fn matches(required: &SkillSet, offered: &SkillSet, mode: MatchMode) -> bool {
    if required.is_empty() {
        return false;
    }
    match mode {
        MatchMode::Any => required.intersects(offered),
        MatchMode::All => required.is_subset(offered),
    }
}
