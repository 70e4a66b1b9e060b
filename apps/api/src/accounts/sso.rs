//! Google OAuth 2.0 authorization-code flow.

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::errors::AppError;
use crate::workflow::SsoIdentity;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const SCOPES: &str = "openid email profile";

#[derive(Clone)]
pub struct GoogleSso {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
}

impl From<GoogleUserInfo> for SsoIdentity {
    fn from(info: GoogleUserInfo) -> Self {
        let name = info
            .name
            .filter(|n| !n.trim().is_empty())
            .or(info.given_name)
            .unwrap_or_else(|| info.email.clone());
        SsoIdentity {
            id: info.id,
            email: info.email,
            name,
        }
    }
}

impl GoogleSso {
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            http: Client::new(),
            client_id,
            client_secret,
            redirect_url,
        }
    }

    /// Where to send the browser; `state` comes back on the callback.
    pub fn authorize_url(&self, state: &str) -> Result<Url, AppError> {
        Url::parse_with_params(
            AUTH_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
            ],
        )
        .map_err(|e| AppError::Sso(format!("invalid authorization URL: {e}")))
    }

    /// Trades the callback code for the signed-in identity.
    pub async fn exchange(&self, code: &str) -> Result<SsoIdentity, AppError> {
        let token = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Sso(format!("token exchange failed: {e}")))?
            .json::<TokenResponse>()
            .await
            .map_err(|e| AppError::Sso(format!("malformed token response: {e}")))?;

        let info = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Sso(format!("userinfo request failed: {e}")))?
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AppError::Sso(format!("malformed userinfo response: {e}")))?;

        Ok(info.into())
    }
}
