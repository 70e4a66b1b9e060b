use axum::{extract::State, Json};

use crate::accounts::Session;
use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::Dashboard;

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(state.workflow.dashboard(session.user()).await?))
}
