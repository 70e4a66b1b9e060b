//! Cookie sessions backed by Redis.
//!
//! The cookie carries an opaque token; the token maps to the SSO subject id
//! under `session:{token}` with a TTL.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "recruit_session";
pub const OAUTH_STATE_COOKIE: &str = "recruit_oauth_state";

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session for `user_id` and returns its token.
    async fn create(&self, user_id: &str) -> Result<String, AppError>;
    async fn user_id(&self, token: &str) -> Result<Option<String>, AppError>;
    async fn destroy(&self, token: &str) -> Result<(), AppError>;
}

pub struct RedisSessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    fn key(token: &str) -> String {
        format!("session:{token}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: &str) -> Result<String, AppError> {
        let token = Uuid::new_v4().to_string();
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(Self::key(&token))
            .arg(user_id)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!("Session created for {user_id}");
        Ok(token)
    }

    async fn user_id(&self, token: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let user_id = redis::cmd("GET")
            .arg(Self::key(token))
            .query_async::<_, Option<String>>(&mut conn)
            .await?;
        Ok(user_id)
    }

    async fn destroy(&self, token: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("DEL")
            .arg(Self::key(token))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

/// The caller's session, if any. Never rejects a request by itself; the
/// workflow gate decides what an anonymous caller may do.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

impl Session {
    pub fn user(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = read_cookie(&parts.headers, SESSION_COOKIE) else {
            return Ok(Session::default());
        };
        let user_id = state.sessions.user_id(&token).await?;
        Ok(Session {
            token: Some(token),
            user_id,
        })
    }
}

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn set_cookie(name: &str, value: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
pub use memory::MemorySessionStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemorySessionStore {
        sessions: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl SessionStore for MemorySessionStore {
        async fn create(&self, user_id: &str) -> Result<String, AppError> {
            let token = Uuid::new_v4().to_string();
            self.sessions
                .lock()
                .unwrap()
                .insert(token.clone(), user_id.to_string());
            Ok(token)
        }

        async fn user_id(&self, token: &str) -> Result<Option<String>, AppError> {
            Ok(self.sessions.lock().unwrap().get(token).cloned())
        }

        async fn destroy(&self, token: &str) -> Result<(), AppError> {
            self.sessions.lock().unwrap().remove(token);
            Ok(())
        }
    }
}
