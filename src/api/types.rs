//! Wire types for the identity provider (Keycloak-compatible).

use serde::Deserialize;

/// Response of the OIDC token endpoint (password or refresh grant).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for gateway requests.
    pub access_token: String,
    /// Token used to obtain a fresh access token.
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: u64,
}

/// Response of the OIDC userinfo endpoint.
///
/// Only the fields the console displays; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// Login name, always present.
    pub preferred_username: String,
    /// Full display name, when the realm provides one.
    #[serde(default)]
    pub name: Option<String>,
}

impl UserInfo {
    /// The name shown in the dashboard header.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.preferred_username)
    }
}

/// Error payload the identity provider returns on a rejected grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenError {
    /// Machine-readable error code (e.g. `invalid_grant`).
    pub error: String,
    /// Human-readable description, when present.
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenError {
    /// Best human-readable message available.
    pub fn message(&self) -> &str {
        self.error_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_parses_keycloak_payload() {
        let json = r#"{
            "access_token": "eyJhbGc...",
            "expires_in": 300,
            "refresh_expires_in": 1800,
            "refresh_token": "eyJhbGc...",
            "token_type": "Bearer",
            "session_state": "abc",
            "scope": "profile email"
        }"#;
        let token: TokenResponse = serde_json::from_str(json).expect("should parse");
        assert_eq!(token.expires_in, 300);
        assert!(!token.refresh_token.is_empty());
    }

    #[test]
    fn userinfo_prefers_full_name() {
        let info = UserInfo {
            preferred_username: "ops".to_string(),
            name: Some("Operations Desk".to_string()),
        };
        assert_eq!(info.display_name(), "Operations Desk");
    }

    #[test]
    fn userinfo_falls_back_to_username() {
        let info = UserInfo {
            preferred_username: "ops".to_string(),
            name: None,
        };
        assert_eq!(info.display_name(), "ops");

        let empty_name = UserInfo {
            preferred_username: "ops".to_string(),
            name: Some(String::new()),
        };
        assert_eq!(empty_name.display_name(), "ops");
    }

    #[test]
    fn token_error_prefers_description() {
        let err: TokenError = serde_json::from_str(
            r#"{"error": "invalid_grant", "error_description": "Invalid user credentials"}"#,
        )
        .expect("should parse");
        assert_eq!(err.message(), "Invalid user credentials");
    }

    #[test]
    fn token_error_falls_back_to_code() {
        let err: TokenError =
            serde_json::from_str(r#"{"error": "invalid_grant"}"#).expect("should parse");
        assert_eq!(err.message(), "invalid_grant");
    }
}
