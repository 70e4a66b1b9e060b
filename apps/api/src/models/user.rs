use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SkillSet;

/// The three roles a portal account can hold. An account without a role yet
/// is represented as `Option<Role>::None`, never as a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Recruiter,
    Applicant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Recruiter => "recruiter",
            Role::Applicant => "applicant",
        }
    }

    /// Parses the stored column value. The empty string means "not chosen yet".
    pub fn from_column(value: &str) -> Result<Option<Role>, UnknownRole> {
        if value.is_empty() {
            Ok(None)
        } else {
            value.parse().map(Some)
        }
    }

    pub fn to_column(role: Option<Role>) -> &'static str {
        role.map(|r| r.as_str()).unwrap_or("")
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "recruiter" => Ok(Role::Recruiter),
            "applicant" => Ok(Role::Applicant),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A portal account, keyed by the SSO subject id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i32>,
    pub skills: SkillSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    pub approved: bool,
}

impl User {
    /// A freshly signed-in account with no role.
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role: None,
            company_id: None,
            skills: SkillSet::new(),
            resume: None,
            approved: false,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}
