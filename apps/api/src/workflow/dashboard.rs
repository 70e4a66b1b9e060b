//! Per-role dashboard views.

use serde::Serialize;

use super::gate::{Recruiter, ROLE_NOT_SELECTED};
use super::Workflow;
use crate::errors::AppError;
use crate::models::{Application, Company, Interview, Job, Role, SkillSet, User};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    SuperAdmin(AdminDashboard),
    Recruiter(RecruiterDashboard),
    Applicant(ApplicantDashboard),
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub name: String,
    pub pending_recruiters: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecruiterDashboard {
    pub name: String,
    pub company: Company,
    pub jobs: Vec<Job>,
    pub applications: Vec<Application>,
    pub interviews: Vec<Interview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicantDashboard {
    pub name: String,
    pub skills: SkillSet,
    pub resume: Option<String>,
    pub jobs: Vec<Job>,
    /// Jobs whose required skills match the applicant's under the configured mode.
    pub recommended_jobs: Vec<Job>,
    pub applications: Vec<Application>,
    pub interviews: Vec<Interview>,
    pub followed_companies: Vec<Company>,
    pub bookmarked_jobs: Vec<Job>,
}

impl Workflow {
    pub async fn dashboard(&self, session_user: Option<&str>) -> Result<Dashboard, AppError> {
        let user = self
            .authorize(
                session_user,
                &[Role::SuperAdmin, Role::Recruiter, Role::Applicant],
            )
            .await?;
        match user.role {
            Some(Role::SuperAdmin) => self.admin_dashboard(user).await.map(Dashboard::SuperAdmin),
            Some(Role::Recruiter) => {
                let recruiter = self.clear_recruiter(user).await?;
                self.recruiter_dashboard(recruiter)
                    .await
                    .map(Dashboard::Recruiter)
            }
            Some(Role::Applicant) => self
                .applicant_dashboard(user)
                .await
                .map(Dashboard::Applicant),
            None => Err(AppError::forbidden(ROLE_NOT_SELECTED)),
        }
    }

    async fn admin_dashboard(&self, user: User) -> Result<AdminDashboard, AppError> {
        let pending = self.store.pending_recruiters().await?;
        Ok(AdminDashboard {
            name: user.name,
            pending_recruiters: pending.len(),
        })
    }

    async fn recruiter_dashboard(
        &self,
        Recruiter { user, company }: Recruiter,
    ) -> Result<RecruiterDashboard, AppError> {
        let jobs = self.store.jobs_by_poster(&user.id).await?;
        let applications = self.store.applications_by_recruiter(&user.id).await?;
        let interviews = self.store.interviews_by_recruiter(&user.id).await?;
        Ok(RecruiterDashboard {
            name: user.name,
            company,
            jobs,
            applications,
            interviews,
        })
    }

    async fn applicant_dashboard(&self, user: User) -> Result<ApplicantDashboard, AppError> {
        let jobs = self.store.list_jobs().await?;
        let recommended_jobs = self
            .store
            .jobs_matching(&user.skills, self.policy.match_mode)
            .await?;
        let applications = self.store.applications_by_applicant(&user.id).await?;
        let interviews = self.store.interviews_by_applicant(&user.id).await?;
        let followed_companies = self.store.followed_companies(&user.id).await?;
        let bookmarked_jobs = self.store.bookmarked_jobs(&user.id).await?;
        Ok(ApplicantDashboard {
            name: user.name,
            skills: user.skills,
            resume: user.resume,
            jobs,
            recommended_jobs,
            applications,
            interviews,
            followed_companies,
            bookmarked_jobs,
        })
    }
}
