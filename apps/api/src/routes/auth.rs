use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::accounts::session::{
    clear_cookie, read_cookie, set_cookie, OAUTH_STATE_COOKIE, SESSION_COOKIE,
};
use crate::accounts::Session;
use crate::errors::AppError;
use crate::models::{Role, SkillSet, User};
use crate::state::AppState;
use crate::workflow::{AccountState, RoleSelection};

const OAUTH_STATE_TTL_SECS: u64 = 10 * 60;

fn secure_cookies(state: &AppState) -> bool {
    state.config.public_base_url.starts_with("https://")
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Value>, AppError> {
    let Some(user_id) = session.user() else {
        return Ok(Json(json!({
            "signed_in": false,
            "login_url": "/auth/google/login"
        })));
    };
    let user = state.workflow.current_user(Some(user_id)).await?;
    let account = state.workflow.account_state(Some(user_id)).await?;
    Ok(Json(json!({
        "signed_in": true,
        "user": user,
        "account_state": account
    })))
}

/// GET /auth/google/login
pub async fn login(State(state): State<AppState>) -> Result<Response, AppError> {
    let oauth_state = Uuid::new_v4().to_string();
    let url = state.sso.authorize_url(&oauth_state)?;
    let cookie = set_cookie(
        OAUTH_STATE_COOKIE,
        &oauth_state,
        OAUTH_STATE_TTL_SECS,
        secure_cookies(&state),
    );
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(url.as_str())).into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/google/callback
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    if let Some(error) = params.error {
        return Err(AppError::validation(format!("Sign-in was not completed: {error}")));
    }
    let expected = read_cookie(&headers, OAUTH_STATE_COOKIE);
    if expected.is_none() || expected != params.state {
        warn!("OAuth callback with mismatched state");
        return Err(AppError::forbidden("Invalid sign-in state"));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Missing authorization code"))?;

    let identity = state.sso.exchange(&code).await?;
    let signed = state.workflow.sign_in(identity).await?;
    let token = state.sessions.create(&signed.user.id).await?;
    info!("User {} signed in", signed.user.id);

    let next = if signed.needs_role {
        "/select-role"
    } else {
        "/dashboard"
    };
    let session_cookie = set_cookie(
        SESSION_COOKIE,
        &token,
        state.config.session_ttl_secs,
        secure_cookies(&state),
    );
    Ok((
        AppendHeaders([
            (SET_COOKIE, session_cookie),
            (SET_COOKIE, clear_cookie(OAUTH_STATE_COOKIE)),
        ]),
        Redirect::to(next),
    )
        .into_response())
}

/// GET /select-role
pub async fn role_status(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Value>, AppError> {
    let account = state.workflow.account_state(session.user()).await?;
    Ok(Json(json!({
        "account_state": account,
        "needs_role": account == AccountState::RoleUnset
    })))
}

#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    pub role: String,
    #[serde(default)]
    pub company_title: String,
    #[serde(default)]
    pub company_description: String,
    #[serde(default)]
    pub company_logo: String,
    #[serde(default)]
    pub skills: SkillSet,
}

impl TryFrom<SelectRoleRequest> for RoleSelection {
    type Error = AppError;

    fn try_from(req: SelectRoleRequest) -> Result<Self, Self::Error> {
        let role = req
            .role
            .trim()
            .parse::<Role>()
            .map_err(|e| AppError::validation(format!("Invalid role: {e}")))?;
        Ok(match role {
            Role::Recruiter => RoleSelection::Recruiter {
                company_title: req.company_title,
                company_description: req.company_description,
                company_logo: req.company_logo,
            },
            Role::Applicant => RoleSelection::Applicant { skills: req.skills },
            Role::SuperAdmin => RoleSelection::SuperAdmin,
        })
    }
}

/// POST /select-role
pub async fn select_role(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SelectRoleRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .workflow
        .select_role(session.user(), RoleSelection::try_from(req)?)
        .await?;
    Ok(Json(user))
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Response, AppError> {
    if let Some(token) = session.token.as_deref() {
        state.sessions.destroy(token).await?;
    }
    Ok((
        AppendHeaders([(SET_COOKIE, clear_cookie(SESSION_COOKIE))]),
        Redirect::to("/"),
    )
        .into_response())
}
