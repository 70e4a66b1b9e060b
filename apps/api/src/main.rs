mod accounts;
mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod notifications;
mod resumes;
mod routes;
mod state;
mod store;
mod workflow;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::accounts::{GoogleSso, RedisSessionStore};
use crate::config::Config;
use crate::db::{bootstrap_schema, create_pool};
use crate::llm_client::LlmClient;
use crate::notifications::{spawn_worker, NotificationQueue, SesMailer};
use crate::resumes::{ResumeIngestor, S3ResumeStorage};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;
use crate::workflow::{Workflow, WorkflowPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruitment portal API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and make sure the schema is current
    let db = create_pool(&config.database_url).await?;
    bootstrap_schema(&db).await?;

    // Sessions live in Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sessions = Arc::new(RedisSessionStore::new(redis, config.session_ttl_secs));
    info!("Redis session store initialized");

    // AWS: S3 / MinIO for resumes, SES for mail
    let aws = load_aws_config(&config).await;
    let s3 = build_s3_client(&aws, &config);
    let resumes = ResumeIngestor::new(Arc::new(S3ResumeStorage::new(
        s3,
        config.s3_bucket.clone(),
    )));
    info!("Resume storage initialized (bucket: {})", config.s3_bucket);

    let mailer = Arc::new(SesMailer::new(
        aws_sdk_sesv2::Client::new(&aws),
        config.mail_from.clone(),
    ));
    let (notifications, inbox) = NotificationQueue::channel();
    spawn_worker(inbox, mailer, config.public_base_url.clone());

    let llm = config.anthropic_api_key.clone().map(LlmClient::new);
    match &llm {
        Some(_) => info!("LLM client initialized (model: {})", llm_client::MODEL),
        None => info!("ANTHROPIC_API_KEY not set; AI resume parsing disabled"),
    }

    let workflow = Workflow::new(
        Arc::new(PgStore::new(db)),
        notifications,
        WorkflowPolicy {
            super_admin_email: config.super_admin_email.clone(),
            match_mode: config.skill_match_mode,
            applications: config.application_policy,
        },
    );
    info!(
        "Workflow ready (skill matching: {}, applications: {})",
        config.skill_match_mode, config.application_policy
    );

    let sso = GoogleSso::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.oauth_redirect_url.clone(),
    );

    // Build app state
    let state = AppState {
        workflow,
        sessions,
        resumes,
        sso,
        llm,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn load_aws_config(config: &Config) -> SdkConfig {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "recruit-static",
    );

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(credentials)
        .load()
        .await
}

/// S3 client for AWS, or for MinIO when an endpoint override is configured.
fn build_s3_client(aws: &SdkConfig, config: &Config) -> aws_sdk_s3::Client {
    let mut builder = aws_sdk_s3::config::Builder::from(aws);
    if let Some(endpoint) = &config.s3_endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }
    aws_sdk_s3::Client::from_conf(builder.build())
}
