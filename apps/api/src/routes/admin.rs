use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::accounts::Session;
use crate::errors::AppError;
use crate::models::PendingRecruiter;
use crate::state::AppState;

/// GET /admin/approve-recruiters
pub async fn pending_recruiters(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<PendingRecruiter>>, AppError> {
    Ok(Json(state.workflow.pending_recruiters(session.user()).await?))
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub recruiter_id: String,
}

/// POST /admin/approve-recruiter
pub async fn approve_recruiter(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<ApproveRequest>,
) -> Result<StatusCode, AppError> {
    state
        .workflow
        .approve_recruiter(session.user(), &req.recruiter_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
