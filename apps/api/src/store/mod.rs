//! Persistence gateway.
//!
//! Every lookup distinguishes "not found" (`Ok(None)`) from a failed query
//! (`Err(StoreError)`). The workflow engine only ever sees `Arc<dyn Store>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::matching::MatchMode;
use crate::models::{
    Application, ApplicationStatus, Company, Interview, InterviewStatus, Job, NewApplication,
    NewCompany, NewInterview, NewJob, PendingRecruiter, SkillSet, User,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, id: &str) -> StoreResult<Option<User>>;
    /// Upsert keyed by `user.id`.
    async fn save_user(&self, user: &User) -> StoreResult<()>;

    async fn insert_company(&self, company: NewCompany) -> StoreResult<Company>;
    async fn get_company(&self, id: i32) -> StoreResult<Option<Company>>;

    async fn insert_job(&self, job: NewJob) -> StoreResult<Job>;
    async fn get_job(&self, id: i32) -> StoreResult<Option<Job>>;
    async fn list_jobs(&self) -> StoreResult<Vec<Job>>;
    async fn jobs_by_poster(&self, user_id: &str) -> StoreResult<Vec<Job>>;
    /// Jobs whose required skills match what an applicant offers.
    async fn jobs_matching(&self, offered: &SkillSet, mode: MatchMode) -> StoreResult<Vec<Job>>;
    /// Applicants whose skills satisfy a recruiter's query.
    async fn applicants_matching(
        &self,
        required: &SkillSet,
        mode: MatchMode,
    ) -> StoreResult<Vec<User>>;

    async fn insert_application(&self, application: NewApplication) -> StoreResult<Application>;
    async fn get_application(&self, id: i32) -> StoreResult<Option<Application>>;
    async fn find_application(
        &self,
        applicant_id: &str,
        job_id: i32,
    ) -> StoreResult<Option<Application>>;
    async fn applications_by_applicant(&self, applicant_id: &str) -> StoreResult<Vec<Application>>;
    /// Applications to jobs the recruiter posted.
    async fn applications_by_recruiter(&self, recruiter_id: &str) -> StoreResult<Vec<Application>>;
    async fn set_application_status(&self, id: i32, status: &ApplicationStatus)
        -> StoreResult<()>;

    async fn insert_interview(&self, interview: NewInterview) -> StoreResult<Interview>;
    async fn get_interview(&self, id: i32) -> StoreResult<Option<Interview>>;
    async fn interviews_by_applicant(&self, applicant_id: &str) -> StoreResult<Vec<Interview>>;
    async fn interviews_by_recruiter(&self, recruiter_id: &str) -> StoreResult<Vec<Interview>>;
    async fn update_interview(
        &self,
        id: i32,
        status: InterviewStatus,
        scheduled_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    /// Idempotent.
    async fn follow_company(&self, user_id: &str, company_id: i32) -> StoreResult<()>;
    async fn company_followers(&self, company_id: i32) -> StoreResult<Vec<User>>;
    async fn followed_companies(&self, user_id: &str) -> StoreResult<Vec<Company>>;

    /// Idempotent.
    async fn bookmark_job(&self, user_id: &str, job_id: i32) -> StoreResult<()>;
    async fn bookmarked_jobs(&self, user_id: &str) -> StoreResult<Vec<Job>>;

    async fn pending_recruiters(&self) -> StoreResult<Vec<PendingRecruiter>>;
    /// Marks the recruiter and their company approved. Returns `false` when
    /// `user_id` is not a recruiter with a company.
    async fn approve_recruiter(&self, user_id: &str) -> StoreResult<bool>;
}
