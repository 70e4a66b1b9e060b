use serde::Deserialize;
use tracing::{info, warn};

use super::{parse_schedule_time, ApplicationPolicy, Workflow};
use crate::errors::AppError;
use crate::models::{Application, Interview, InterviewStatus, NewApplication, Role, SkillSet, User};
use crate::notifications::Notification;

pub const PROFILE_INCOMPLETE: &str = "Please upload a resume and add skills before applying.";

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewResponse {
    pub interview_id: i32,
    /// `accepted` or `declined`.
    pub status: String,
    /// Only honored when declining.
    #[serde(default)]
    pub alternative_time: Option<String>,
}

impl Workflow {
    /// Submits the applicant's current resume to a job.
    pub async fn apply_job(
        &self,
        session_user: Option<&str>,
        job_id: i32,
    ) -> Result<Application, AppError> {
        let user = self.authorize(session_user, &[Role::Applicant]).await?;
        let resume = match user.resume.as_deref() {
            Some(resume) if !resume.is_empty() && !user.skills.is_empty() => resume.to_string(),
            _ => return Err(AppError::validation(PROFILE_INCOMPLETE)),
        };

        self.store
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

        if self.policy.applications == ApplicationPolicy::Idempotent
            && self.store.find_application(&user.id, job_id).await?.is_some()
        {
            return Err(AppError::Conflict(format!(
                "You have already applied to job {job_id}"
            )));
        }

        let application = self
            .store
            .insert_application(NewApplication {
                job_id,
                applicant_id: user.id,
                resume,
            })
            .await?;
        info!(
            "Application {} submitted to job {job_id}",
            application.id
        );
        Ok(application)
    }

    /// Records a stored resume on an already authorized applicant.
    pub async fn attach_resume(&self, mut user: User, key: String) -> Result<User, AppError> {
        if !user.has_role(Role::Applicant) {
            return Err(AppError::forbidden(super::gate::INSUFFICIENT_PERMISSIONS));
        }
        user.resume = Some(key);
        self.store.save_user(&user).await?;
        Ok(user)
    }

    pub async fn update_skills(
        &self,
        session_user: Option<&str>,
        skills: SkillSet,
    ) -> Result<User, AppError> {
        let mut user = self.authorize(session_user, &[Role::Applicant]).await?;
        if skills.is_empty() {
            return Err(AppError::validation("At least one skill is required"));
        }
        user.skills = skills;
        self.store.save_user(&user).await?;
        Ok(user)
    }

    /// Accepts or declines an interview. Declining with an alternative time
    /// moves the interview and tells the recruiter.
    pub async fn respond_to_interview(
        &self,
        session_user: Option<&str>,
        response: InterviewResponse,
    ) -> Result<Interview, AppError> {
        let user = self.authorize(session_user, &[Role::Applicant]).await?;

        let status = match response.status.trim().parse::<InterviewStatus>() {
            Ok(status @ (InterviewStatus::Accepted | InterviewStatus::Declined)) => status,
            _ => return Err(AppError::validation("Invalid interview status")),
        };
        let alternative = match response.alternative_time.as_deref().map(str::trim) {
            Some(raw) if status == InterviewStatus::Declined && !raw.is_empty() => {
                Some(parse_schedule_time(raw)?)
            }
            _ => None,
        };

        let mut interview = self
            .store
            .get_interview(response.interview_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Interview {} not found", response.interview_id))
            })?;
        if interview.applicant_id != user.id {
            return Err(AppError::forbidden(
                "This interview belongs to another applicant",
            ));
        }
        // Accepted is terminal; a declined interview may be declined again.
        if interview.status == InterviewStatus::Accepted {
            return Err(AppError::forbidden(
                "This interview has already been accepted",
            ));
        }

        interview.status = status;
        if let Some(alternative) = alternative {
            interview.scheduled_at = alternative;
        }
        self.store
            .update_interview(interview.id, interview.status, interview.scheduled_at)
            .await?;
        info!("Interview {} {}", interview.id, interview.status.as_str());

        if alternative.is_some() {
            self.notify_alternative_time(&user, &interview).await;
        }
        Ok(interview)
    }

    async fn notify_alternative_time(&self, applicant: &User, interview: &Interview) {
        let recruiter = match self.store.get_user(&interview.recruiter_id).await {
            Ok(Some(recruiter)) => recruiter,
            Ok(None) => {
                warn!(
                    "Recruiter {} for interview {} no longer exists",
                    interview.recruiter_id, interview.id
                );
                return;
            }
            Err(e) => {
                warn!("Failed to load recruiter for interview {}: {e}", interview.id);
                return;
            }
        };
        let job_title = match self.store.get_job(interview.job_id).await {
            Ok(Some(job)) => job.title,
            Ok(None) => format!("job {}", interview.job_id),
            Err(e) => {
                warn!("Failed to load job for interview {}: {e}", interview.id);
                return;
            }
        };
        self.notify(Notification::AlternativeTimeProposed {
            to: recruiter.email,
            job_title,
            applicant_name: applicant.name.clone(),
            alternative_time: interview.scheduled_at,
        });
    }

    pub async fn follow_company(
        &self,
        session_user: Option<&str>,
        company_id: i32,
    ) -> Result<(), AppError> {
        let user = self.authorize(session_user, &[Role::Applicant]).await?;
        self.store
            .get_company(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {company_id} not found")))?;
        self.store.follow_company(&user.id, company_id).await?;
        Ok(())
    }

    pub async fn bookmark_job(
        &self,
        session_user: Option<&str>,
        job_id: i32,
    ) -> Result<(), AppError> {
        let user = self.authorize(session_user, &[Role::Applicant]).await?;
        self.store
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
        self.store.bookmark_job(&user.id, job_id).await?;
        Ok(())
    }
}
