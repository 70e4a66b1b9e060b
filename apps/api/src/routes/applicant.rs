use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::accounts::Session;
use crate::errors::AppError;
use crate::models::{Application, Interview, Role, SkillSet, User};
use crate::state::AppState;
use crate::workflow::applicant::InterviewResponse;

const RESUME_FIELD: &str = "resume";

/// Request body cap for resume uploads, applied on the upload route only.
pub const MAX_RESUME_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn upload_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Resume exceeds the {} MiB upload limit",
            MAX_RESUME_UPLOAD_BYTES / (1024 * 1024)
        ))
    } else {
        AppError::validation(format!("Malformed upload: {e}"))
    }
}

#[derive(Debug, Deserialize)]
pub struct JobRef {
    pub job_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct CompanyRef {
    pub company_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    pub skills: SkillSet,
}

/// POST /applicant/apply-job
pub async fn apply_job(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<JobRef>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let application = state.workflow.apply_job(session.user(), req.job_id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// POST /applicant/upload-resume (multipart, field `resume`)
pub async fn upload_resume(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<User>, AppError> {
    let user = state
        .workflow
        .authorize(session.user(), &[Role::Applicant])
        .await?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;
        upload = Some((filename, bytes));
        break;
    }
    let (filename, bytes) = upload
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| AppError::validation("No resume file uploaded"))?;

    let key = state.resumes.store(&user.id, &filename, bytes).await?;
    let user = state.workflow.attach_resume(user, key).await?;
    Ok(Json(user))
}

/// POST /applicant/update-skills
pub async fn update_skills(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SkillsRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .workflow
        .update_skills(session.user(), req.skills)
        .await?;
    Ok(Json(user))
}

/// POST /applicant/update-interview
pub async fn update_interview(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<InterviewResponse>,
) -> Result<Json<Interview>, AppError> {
    let interview = state
        .workflow
        .respond_to_interview(session.user(), req)
        .await?;
    Ok(Json(interview))
}

/// POST /applicant/follow-company
pub async fn follow_company(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CompanyRef>,
) -> Result<StatusCode, AppError> {
    state
        .workflow
        .follow_company(session.user(), req.company_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /applicant/bookmark-job
pub async fn bookmark_job(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<JobRef>,
) -> Result<StatusCode, AppError> {
    state
        .workflow
        .bookmark_job(session.user(), req.job_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
