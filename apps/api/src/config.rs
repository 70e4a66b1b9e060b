use anyhow::{Context, Result};

use crate::matching::MatchMode;
use crate::workflow::ApplicationPolicy;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    /// Set for MinIO or other S3-compatible endpoints; AWS otherwise.
    pub s3_endpoint: Option<String>,
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub oauth_redirect_url: String,
    pub mail_from: String,
    pub super_admin_email: String,
    pub public_base_url: String,
    /// AI resume parsing is disabled when absent.
    pub anthropic_api_key: Option<String>,
    pub skill_match_mode: MatchMode,
    pub application_policy: ApplicationPolicy,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port: u16 = optional_env("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            database_url: database_url_from_env()?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: optional_env("S3_ENDPOINT"),
            aws_region: optional_env("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            google_client_id: require_env("GOOGLE_CLIENT_ID")?,
            google_client_secret: require_env("GOOGLE_CLIENT_SECRET")?,
            oauth_redirect_url: optional_env("OAUTH_REDIRECT_URL").unwrap_or_else(|| {
                format!("http://localhost:{port}/auth/google/callback")
            }),
            mail_from: require_env("MAIL_FROM")?,
            super_admin_email: require_env("SUPER_ADMIN_EMAIL")?,
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            skill_match_mode: optional_env("SKILL_MATCH_MODE")
                .map(|v| v.parse::<MatchMode>())
                .transpose()
                .map_err(anyhow::Error::msg)?
                .unwrap_or_default(),
            application_policy: optional_env("APPLICATION_POLICY")
                .map(|v| v.parse::<ApplicationPolicy>())
                .transpose()
                .map_err(anyhow::Error::msg)?
                .unwrap_or_default(),
            session_ttl_secs: optional_env("SESSION_TTL_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("SESSION_TTL_SECS must be a number of seconds")?
                .unwrap_or(7 * 24 * 60 * 60),
            port,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from the discrete
/// `DB_*` variables.
fn database_url_from_env() -> Result<String> {
    if let Some(url) = optional_env("DATABASE_URL") {
        return Ok(url);
    }
    Ok(compose_database_url(
        &require_env("DB_HOST").context("set DATABASE_URL or the DB_* variables")?,
        &optional_env("DB_PORT").unwrap_or_else(|| "5432".to_string()),
        &require_env("DB_NAME")?,
        &require_env("DB_USER")?,
        &optional_env("DB_PASSWORD").unwrap_or_default(),
    ))
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://app@localhost:5432/portal".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            s3_bucket: "resumes".to_string(),
            s3_endpoint: None,
            aws_region: "us-east-1".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            google_client_id: "client-id".to_string(),
            google_client_secret: "client-secret".to_string(),
            oauth_redirect_url: "http://localhost:8080/auth/google/callback".to_string(),
            mail_from: "noreply@example.com".to_string(),
            super_admin_email: "admin@example.com".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            anthropic_api_key: None,
            skill_match_mode: MatchMode::Any,
            application_policy: ApplicationPolicy::Permissive,
            session_ttl_secs: 3600,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn compose_database_url(host: &str, port: &str, name: &str, user: &str, password: &str) -> String {
    if password.is_empty() {
        format!("postgres://{user}@{host}:{port}/{name}?sslmode=disable")
    } else {
        format!("postgres://{user}:{password}@{host}:{port}/{name}?sslmode=disable")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_database_url_with_password() {
        assert_eq!(
            compose_database_url("db", "5433", "portal", "app", "s3cret"),
            "postgres://app:s3cret@db:5433/portal?sslmode=disable"
        );
    }

    #[test]
    fn test_compose_database_url_without_password() {
        assert_eq!(
            compose_database_url("localhost", "5432", "portal", "app", ""),
            "postgres://app@localhost:5432/portal?sslmode=disable"
        );
    }
}
