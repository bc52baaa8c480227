/// OIDC password-grant authentication.
pub mod auth;

/// Gateway upload client.
pub mod client;

/// API error types.
pub mod error;

/// Wire types for the identity provider.
pub mod types;

pub use auth::{AuthClient, AuthState, Session};
pub use client::GatewayClient;
pub use error::ApiError;
