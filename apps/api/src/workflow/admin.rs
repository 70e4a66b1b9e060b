use tracing::info;

use super::Workflow;
use crate::errors::AppError;
use crate::models::{PendingRecruiter, Role};

impl Workflow {
    pub async fn pending_recruiters(
        &self,
        session_user: Option<&str>,
    ) -> Result<Vec<PendingRecruiter>, AppError> {
        self.authorize(session_user, &[Role::SuperAdmin]).await?;
        Ok(self.store.pending_recruiters().await?)
    }

    /// Approves a recruiter together with their company, atomically.
    pub async fn approve_recruiter(
        &self,
        session_user: Option<&str>,
        recruiter_id: &str,
    ) -> Result<(), AppError> {
        let admin = self.authorize(session_user, &[Role::SuperAdmin]).await?;
        if !self.store.approve_recruiter(recruiter_id).await? {
            return Err(AppError::NotFound(format!(
                "Recruiter {recruiter_id} not found"
            )));
        }
        info!("Recruiter {recruiter_id} approved by {}", admin.id);
        Ok(())
    }
}
