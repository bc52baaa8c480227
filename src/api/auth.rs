//! OIDC password-grant authentication against a Keycloak-style issuer.
//!
//! Login and refresh both go through the realm's token endpoint. The
//! password is never configured in a file; it comes from the
//! `FPC_AUTH_PASSWORD` environment variable only.

use std::time::{Duration, Instant};

use crate::api::error::{body_snippet, ApiError};
use crate::api::types::{TokenError, TokenResponse, UserInfo};
use crate::config::schema::AuthConfig;

/// Environment variable holding the password for the password grant.
pub const PASSWORD_ENV: &str = "FPC_AUTH_PASSWORD";

/// How often the background task checks whether a refresh is due.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Refresh when less than this much validity remains.
pub const MIN_VALIDITY: Duration = Duration::from_secs(60);

/// Authentication state as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// `[auth] enabled = false`; requests go out without credentials.
    #[default]
    Disabled,
    /// Login in progress.
    Pending,
    /// Logged in; `user` is the display name for the header.
    Authenticated {
        /// Display name from the userinfo endpoint.
        user: String,
        /// Current bearer token.
        token: String,
    },
    /// Login or refresh failed; uploads are refused until re-login.
    Failed {
        /// Why the session dropped.
        reason: String,
    },
}

impl AuthState {
    /// Bearer token to attach to gateway requests, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }
}

/// A live token pair with its expiry deadline.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token for gateway requests.
    pub access_token: String,
    /// Token for the refresh grant.
    pub refresh_token: String,
    /// When `access_token` stops being valid.
    pub expires_at: Instant,
}

impl Session {
    fn from_response(token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        }
    }

    /// Whether the access token is close enough to expiry to warrant a refresh.
    pub fn needs_refresh(&self) -> bool {
        self.expires_at.saturating_duration_since(Instant::now()) < MIN_VALIDITY
    }
}

/// Client for the realm's OIDC endpoints.
pub struct AuthClient {
    http: reqwest::Client,
    config: AuthConfig,
}

impl AuthClient {
    /// Creates a client for the configured realm.
    pub fn new(config: AuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Token endpoint of the configured realm.
    fn token_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.config.issuer_url.trim_end_matches('/'),
            self.config.realm
        )
    }

    /// Userinfo endpoint of the configured realm.
    fn userinfo_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/userinfo",
            self.config.issuer_url.trim_end_matches('/'),
            self.config.realm
        )
    }

    /// Log in with the password grant.
    pub async fn login(&self, password: &str) -> Result<Session, ApiError> {
        let params = [
            ("grant_type", "password"),
            ("client_id", &self.config.client_id),
            ("username", &self.config.username),
            ("password", password),
        ];
        self.token_request(&params).await
    }

    /// Exchange a refresh token for a fresh session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, ApiError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", &self.config.client_id),
            ("refresh_token", refresh_token),
        ];
        self.token_request(&params).await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<Session, ApiError> {
        let response = self
            .http
            .post(self.token_endpoint())
            .form(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let token: TokenResponse =
                serde_json::from_str(&body).map_err(|e| ApiError::AuthFailed {
                    reason: format!("malformed token response: {e}"),
                })?;
            Ok(Session::from_response(token))
        } else {
            let reason = serde_json::from_str::<TokenError>(&body)
                .map(|e| e.message().to_string())
                .unwrap_or_else(|_| format!("HTTP {}: {}", status.as_u16(), body_snippet(&body)));
            Err(ApiError::AuthFailed { reason })
        }
    }

    /// Fetch the display name of the logged-in user.
    pub async fn userinfo(&self, access_token: &str) -> Result<UserInfo, ApiError> {
        let response = self
            .http
            .get(self.userinfo_endpoint())
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ApiError::AuthFailed {
                reason: format!("malformed userinfo response: {e}"),
            })
        } else {
            Err(ApiError::Http {
                status: status.as_u16(),
                body: body_snippet(&body),
            })
        }
    }
}

/// Password from the `FPC_AUTH_PASSWORD` environment variable.
///
/// Returns `None` when the variable is unset or empty.
pub fn password_from_env() -> Option<String> {
    std::env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty())
}
