use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Schema statements, in dependency order. Every statement is idempotent so the
/// list runs unconditionally at startup; columns added after the first release
/// are appended as `ADD COLUMN IF NOT EXISTS`.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        logo TEXT,
        approved BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT UNIQUE NOT NULL,
        name TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT '',
        skills JSONB,
        approved BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#,
    "ALTER TABLE users ADD COLUMN IF NOT EXISTS company_id INTEGER \
     REFERENCES companies(id) ON DELETE SET NULL",
    "ALTER TABLE users ADD COLUMN IF NOT EXISTS resume TEXT",
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        skills JSONB NOT NULL DEFAULT '[]'::jsonb,
        company_id INTEGER NOT NULL REFERENCES companies(id),
        posted_by TEXT NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id SERIAL PRIMARY KEY,
        job_id INTEGER NOT NULL REFERENCES jobs(id),
        applicant_id TEXT NOT NULL REFERENCES users(id),
        resume TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS interviews (
        id SERIAL PRIMARY KEY,
        job_id INTEGER NOT NULL REFERENCES jobs(id),
        applicant_id TEXT NOT NULL REFERENCES users(id),
        recruiter_id TEXT NOT NULL REFERENCES users(id),
        scheduled_at TIMESTAMPTZ NOT NULL,
        status TEXT NOT NULL DEFAULT 'requested'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS company_followers (
        user_id TEXT NOT NULL REFERENCES users(id),
        company_id INTEGER NOT NULL REFERENCES companies(id),
        PRIMARY KEY (user_id, company_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_bookmarks (
        user_id TEXT NOT NULL REFERENCES users(id),
        job_id INTEGER NOT NULL REFERENCES jobs(id),
        PRIMARY KEY (user_id, job_id)
    )
    "#,
];

/// Creates missing tables and columns.
pub async fn bootstrap_schema(pool: &PgPool) -> Result<()> {
    for (index, statement) in SCHEMA.iter().enumerate() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("schema statement #{index} failed"))?;
    }
    info!("Schema bootstrap complete ({} statements)", SCHEMA.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_are_idempotent() {
        for statement in SCHEMA {
            let normalized = statement.to_uppercase();
            assert!(
                normalized.contains("IF NOT EXISTS"),
                "statement is not idempotent: {statement}"
            );
        }
    }

    #[test]
    fn test_relation_tables_have_composite_keys() {
        let followers = SCHEMA
            .iter()
            .find(|s| s.contains("company_followers"))
            .unwrap();
        assert!(followers.contains("PRIMARY KEY (user_id, company_id)"));
    }
}
