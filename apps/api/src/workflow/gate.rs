//! Authorization gate.
//!
//! No session → `Unauthorized`; stale session subject → `NotFound`; missing or
//! disallowed role, or an uncleared recruiter → `Forbidden`.

use anyhow::anyhow;
use serde::Serialize;

use super::Workflow;
use crate::errors::AppError;
use crate::models::{Company, Role, User};

pub const ROLE_NOT_SELECTED: &str = "Select a role before continuing";
pub const INSUFFICIENT_PERMISSIONS: &str = "Access denied: insufficient permissions";
pub const PENDING_APPROVAL: &str = "Your recruiter account is pending approval.";

/// A recruiter who passed the approval gate, with their company.
#[derive(Debug, Clone, Serialize)]
pub struct Recruiter {
    pub user: User,
    pub company: Company,
}

/// Both the recruiter and the company they registered must be approved.
pub fn recruiter_cleared(user: &User, company: &Company) -> bool {
    user.approved && company.approved
}

impl Workflow {
    pub async fn current_user(&self, session_user: Option<&str>) -> Result<User, AppError> {
        let id = session_user.ok_or(AppError::Unauthorized)?;
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    /// Loads the caller and checks their role against `allowed`.
    pub async fn authorize(
        &self,
        session_user: Option<&str>,
        allowed: &[Role],
    ) -> Result<User, AppError> {
        let user = self.current_user(session_user).await?;
        match user.role {
            None => Err(AppError::forbidden(ROLE_NOT_SELECTED)),
            Some(role) if allowed.contains(&role) => Ok(user),
            Some(_) => Err(AppError::forbidden(INSUFFICIENT_PERMISSIONS)),
        }
    }

    /// Recruiter-only actions: role check plus the approval gate.
    pub async fn authorize_recruiter(
        &self,
        session_user: Option<&str>,
    ) -> Result<Recruiter, AppError> {
        let user = self.authorize(session_user, &[Role::Recruiter]).await?;
        self.clear_recruiter(user).await
    }

    pub(super) async fn clear_recruiter(&self, user: User) -> Result<Recruiter, AppError> {
        let company = self.recruiter_company(&user).await?;
        if !recruiter_cleared(&user, &company) {
            return Err(AppError::forbidden(PENDING_APPROVAL));
        }
        Ok(Recruiter { user, company })
    }

    pub(super) async fn recruiter_company(&self, user: &User) -> Result<Company, AppError> {
        let company_id = user
            .company_id
            .ok_or_else(|| anyhow!("recruiter {} has no company", user.id))?;
        let company = self
            .store
            .get_company(company_id)
            .await?
            .ok_or_else(|| anyhow!("recruiter {} references missing company {company_id}", user.id))?;
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;

    #[tokio::test]
    async fn test_no_session_is_unauthorized() {
        let h = Harness::new();
        let err = h.workflow.authorize(None, &[Role::Applicant]).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_not_found() {
        let h = Harness::new();
        let err = h
            .workflow
            .authorize(Some("ghost"), &[Role::Applicant])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unset_role_is_forbidden() {
        let h = Harness::new();
        h.sign_in("u1", "u1@example.com").await;
        let err = h
            .workflow
            .authorize(Some("u1"), &[Role::Applicant, Role::Recruiter, Role::SuperAdmin])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == ROLE_NOT_SELECTED));
    }

    #[tokio::test]
    async fn test_role_outside_allow_list_is_forbidden() {
        let h = Harness::new();
        h.applicant("a1", &["go"]).await;
        let err = h
            .workflow
            .authorize(Some("a1"), &[Role::Recruiter])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == INSUFFICIENT_PERMISSIONS));
    }

    #[tokio::test]
    async fn test_recruiter_gate_requires_user_and_company_approval() {
        let h = Harness::new();
        let recruiter = h.recruiter("r1", "Acme").await;

        let err = h.workflow.authorize_recruiter(Some("r1")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == PENDING_APPROVAL));

        // Company approved, user not.
        let mut company = h.company_of(&recruiter).await;
        company.approved = true;
        assert!(!recruiter_cleared(&recruiter, &company));

        // User approved, company not.
        let mut user = recruiter.clone();
        user.approved = true;
        company.approved = false;
        assert!(!recruiter_cleared(&user, &company));

        company.approved = true;
        assert!(recruiter_cleared(&user, &company));
    }

    #[tokio::test]
    async fn test_approved_recruiter_passes_gate() {
        let h = Harness::new();
        h.approved_recruiter("r1", "Acme").await;
        let recruiter = h.workflow.authorize_recruiter(Some("r1")).await.unwrap();
        assert_eq!(recruiter.company.title, "Acme");
    }
}
