use std::sync::Arc;

use crate::accounts::{GoogleSso, SessionStore};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resumes::ResumeIngestor;
use crate::workflow::Workflow;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Workflow,
    pub sessions: Arc<dyn SessionStore>,
    pub resumes: ResumeIngestor,
    pub sso: GoogleSso,
    /// AI resume parsing is off when no API key is configured.
    pub llm: Option<LlmClient>,
    pub config: Config,
}
