//! Role-gated workflow engine.
//!
//! Every operation takes the session's user id (if any), passes it through the
//! authorization gate, and then works against the injected `Store`. Side
//! effects toward people (email) are only ever enqueued.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::errors::AppError;
use crate::matching::MatchMode;
use crate::notifications::{Notification, NotificationQueue};
use crate::store::Store;

pub mod admin;
pub mod applicant;
pub mod dashboard;
pub mod gate;
pub mod lifecycle;
pub mod recruiter;

#[cfg(test)]
mod testing;

pub use dashboard::Dashboard;
pub use lifecycle::{AccountState, RoleSelection, SsoIdentity};

/// How repeated applications by the same applicant to the same job are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplicationPolicy {
    /// Every submission creates a new application.
    #[default]
    Permissive,
    /// A second submission is rejected with a conflict.
    Idempotent,
}

impl FromStr for ApplicationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(ApplicationPolicy::Permissive),
            "idempotent" => Ok(ApplicationPolicy::Idempotent),
            other => Err(format!(
                "unknown application policy '{other}' (expected permissive|idempotent)"
            )),
        }
    }
}

impl fmt::Display for ApplicationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationPolicy::Permissive => f.write_str("permissive"),
            ApplicationPolicy::Idempotent => f.write_str("idempotent"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowPolicy {
    /// The one identity that becomes super admin on sign-in.
    pub super_admin_email: String,
    pub match_mode: MatchMode,
    pub applications: ApplicationPolicy,
}

#[derive(Clone)]
pub struct Workflow {
    store: Arc<dyn Store>,
    notifications: NotificationQueue,
    policy: WorkflowPolicy,
}

impl Workflow {
    pub fn new(
        store: Arc<dyn Store>,
        notifications: NotificationQueue,
        policy: WorkflowPolicy,
    ) -> Self {
        Self {
            store,
            notifications,
            policy,
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifications.enqueue(notification);
    }

    fn is_designated_admin(&self, email: &str) -> bool {
        !self.policy.super_admin_email.is_empty()
            && email.eq_ignore_ascii_case(&self.policy.super_admin_email)
    }
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Accepts `YYYY-MM-DD HH:MM` (read as UTC) or RFC 3339.
pub fn parse_schedule_time(input: &str) -> Result<DateTime<Utc>, AppError> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(input, TIME_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| AppError::validation("Invalid time format (use YYYY-MM-DD HH:MM)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schedule_time_form_format() {
        let parsed = parse_schedule_time("2026-05-04 09:30").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_schedule_time_rfc3339_is_normalized_to_utc() {
        let parsed = parse_schedule_time("2026-05-04T11:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_schedule_time_rejects_garbage() {
        assert!(matches!(
            parse_schedule_time("next tuesday"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_application_policy_parse() {
        assert_eq!(
            "Idempotent".parse::<ApplicationPolicy>().unwrap(),
            ApplicationPolicy::Idempotent
        );
        assert!("strict".parse::<ApplicationPolicy>().is_err());
    }
}
