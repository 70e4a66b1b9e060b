use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::accounts::Session;
use crate::errors::AppError;
use crate::models::{Application, ApplicationStatus, Interview, Job, SkillSet, User};
use crate::resumes::parser::{parse_resume, ParsedResume};
use crate::state::AppState;
use crate::workflow::recruiter::{InterviewRequest, JobPosting};

/// POST /recruiter/post-job
pub async fn post_job(
    State(state): State<AppState>,
    session: Session,
    Json(posting): Json<JobPosting>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = state.workflow.post_job(session.user(), posting).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub skills: SkillSet,
}

/// POST /recruiter/search-applicants
pub async fn search_applicants(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Vec<User>>, AppError> {
    let applicants = state
        .workflow
        .search_applicants(session.user(), req.skills)
        .await?;
    Ok(Json(applicants))
}

/// POST /recruiter/request-interview
pub async fn request_interview(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<InterviewRequest>,
) -> Result<(StatusCode, Json<Interview>), AppError> {
    let interview = state.workflow.request_interview(session.user(), req).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

#[derive(Debug, Deserialize)]
pub struct ApplicationRef {
    pub application_id: i32,
}

/// GET /recruiter/review-application?application_id=
pub async fn application_for_review(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ApplicationRef>,
) -> Result<Json<Application>, AppError> {
    let application = state
        .workflow
        .application_for_review(session.user(), params.application_id)
        .await?;
    Ok(Json(application))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub application_id: i32,
    pub status: ApplicationStatus,
}

/// POST /recruiter/review-application
pub async fn review_application(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<Application>, AppError> {
    let application = state
        .workflow
        .review_application(session.user(), req.application_id, req.status)
        .await?;
    Ok(Json(application))
}

/// POST /recruiter/parse-resume
pub async fn parse_application_resume(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<ApplicationRef>,
) -> Result<Json<ParsedResume>, AppError> {
    let application = state
        .workflow
        .application_for_review(session.user(), req.application_id)
        .await?;
    let llm = state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured("AI resume parsing is not enabled".to_string()))?;
    let text = state.resumes.load_text(&application.resume).await?;
    Ok(Json(parse_resume(&text, llm).await?))
}
