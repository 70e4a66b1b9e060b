use serde::Deserialize;
use tracing::{info, warn};

use super::gate::Recruiter;
use super::{parse_schedule_time, Workflow};
use crate::errors::AppError;
use crate::models::{
    Application, ApplicationStatus, Company, Interview, Job, NewInterview, NewJob, Role, SkillSet,
    User,
};
use crate::notifications::Notification;

#[derive(Debug, Clone, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub skills: SkillSet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewRequest {
    pub applicant_id: String,
    pub job_id: i32,
    /// `YYYY-MM-DD HH:MM` (UTC) or RFC 3339.
    pub scheduled_at: String,
}

impl Workflow {
    /// Creates a job for the recruiter's company and tells its followers.
    ///
    /// Follower fan-out is best-effort: the job exists even if nobody is told.
    pub async fn post_job(
        &self,
        session_user: Option<&str>,
        posting: JobPosting,
    ) -> Result<Job, AppError> {
        let Recruiter { user, company } = self.authorize_recruiter(session_user).await?;

        let title = posting.title.trim();
        let description = posting.description.trim();
        if title.is_empty() || description.is_empty() || posting.skills.is_empty() {
            return Err(AppError::validation(
                "Title, description, and skills are required",
            ));
        }

        let job = self
            .store
            .insert_job(NewJob {
                title: title.to_string(),
                description: description.to_string(),
                skills: posting.skills,
                company_id: company.id,
                posted_by: user.id,
            })
            .await?;
        info!("Job {} posted for company {}", job.id, company.id);

        self.notify_followers(&company, &job).await;
        Ok(job)
    }

    async fn notify_followers(&self, company: &Company, job: &Job) {
        match self.store.company_followers(company.id).await {
            Ok(followers) => {
                let count = followers.len();
                for follower in followers {
                    self.notify(Notification::JobPosted {
                        to: follower.email,
                        job_title: job.title.clone(),
                        company_title: company.title.clone(),
                    });
                }
                info!("Queued {count} job alerts for job {}", job.id);
            }
            Err(e) => warn!(
                "Failed to load followers of company {} for job {}: {e}",
                company.id, job.id
            ),
        }
    }

    pub async fn search_applicants(
        &self,
        session_user: Option<&str>,
        required: SkillSet,
    ) -> Result<Vec<User>, AppError> {
        self.authorize_recruiter(session_user).await?;
        if required.is_empty() {
            return Err(AppError::validation("At least one skill is required"));
        }
        let applicants = self
            .store
            .applicants_matching(&required, self.policy.match_mode)
            .await?;
        Ok(applicants)
    }

    /// Schedules an interview for one of the recruiter's company jobs and
    /// invites the applicant.
    pub async fn request_interview(
        &self,
        session_user: Option<&str>,
        request: InterviewRequest,
    ) -> Result<Interview, AppError> {
        let Recruiter { user, company } = self.authorize_recruiter(session_user).await?;
        let scheduled_at = parse_schedule_time(&request.scheduled_at)?;

        let job = self.company_job(&company, request.job_id).await?;

        let applicant = self
            .store
            .get_user(&request.applicant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.applicant_id)))?;
        if !applicant.has_role(Role::Applicant) {
            return Err(AppError::validation(format!(
                "User {} is not an applicant",
                applicant.id
            )));
        }

        let interview = self
            .store
            .insert_interview(NewInterview {
                job_id: job.id,
                applicant_id: applicant.id,
                recruiter_id: user.id,
                scheduled_at,
            })
            .await?;
        info!(
            "Interview {} requested for job {} at {}",
            interview.id, job.id, interview.scheduled_at
        );

        self.notify(Notification::InterviewRequested {
            to: applicant.email,
            job_title: job.title,
            scheduled_at: interview.scheduled_at,
            interview_id: interview.id,
        });
        Ok(interview)
    }

    /// One application to a job of the recruiter's company.
    pub async fn application_for_review(
        &self,
        session_user: Option<&str>,
        application_id: i32,
    ) -> Result<Application, AppError> {
        let recruiter = self.authorize_recruiter(session_user).await?;
        self.company_application(&recruiter.company, application_id)
            .await
    }

    pub async fn review_application(
        &self,
        session_user: Option<&str>,
        application_id: i32,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        if status.as_str().trim().is_empty() {
            return Err(AppError::validation("Status is required"));
        }
        let recruiter = self.authorize_recruiter(session_user).await?;
        let mut application = self
            .company_application(&recruiter.company, application_id)
            .await?;

        self.store
            .set_application_status(application.id, &status)
            .await?;
        info!("Application {} marked {status}", application.id);
        application.status = status;
        Ok(application)
    }

    async fn company_job(&self, company: &Company, job_id: i32) -> Result<Job, AppError> {
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
        if job.company_id != company.id {
            return Err(AppError::forbidden(
                "This job belongs to another company",
            ));
        }
        Ok(job)
    }

    async fn company_application(
        &self,
        company: &Company,
        application_id: i32,
    ) -> Result<Application, AppError> {
        let application = self
            .store
            .get_application(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;
        self.company_job(company, application.job_id).await?;
        Ok(application)
    }
}
