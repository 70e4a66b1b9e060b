pub mod admin;
pub mod applicant;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod recruiter;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(auth::home))
        // Sign-in and role selection
        .route("/auth/google/login", get(auth::login))
        .route("/auth/google/callback", get(auth::callback))
        .route("/select-role", get(auth::role_status).post(auth::select_role))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        // Recruiter
        .route("/recruiter/post-job", post(recruiter::post_job))
        .route(
            "/recruiter/search-applicants",
            post(recruiter::search_applicants),
        )
        .route(
            "/recruiter/request-interview",
            post(recruiter::request_interview),
        )
        .route(
            "/recruiter/review-application",
            get(recruiter::application_for_review).post(recruiter::review_application),
        )
        .route(
            "/recruiter/parse-resume",
            post(recruiter::parse_application_resume),
        )
        // Applicant
        .route("/applicant/apply-job", post(applicant::apply_job))
        .route(
            "/applicant/upload-resume",
            post(applicant::upload_resume)
                .layer(DefaultBodyLimit::max(applicant::MAX_RESUME_UPLOAD_BYTES)),
        )
        .route("/applicant/update-skills", post(applicant::update_skills))
        .route(
            "/applicant/update-interview",
            post(applicant::update_interview),
        )
        .route("/applicant/follow-company", post(applicant::follow_company))
        .route("/applicant/bookmark-job", post(applicant::bookmark_job))
        // Super admin
        .route(
            "/admin/approve-recruiters",
            get(admin::pending_recruiters),
        )
        .route("/admin/approve-recruiter", post(admin::approve_recruiter))
        .with_state(state)
}
