//! Error types for gateway and identity-provider communication.

use thiserror::Error;

/// Errors that can occur when talking to the gateway or the identity provider.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The file to upload could not be read.
    #[error("Failed to read file: {path}")]
    Io {
        /// Path of the file that could not be read.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file name does not start with a 7-digit contract id.
    #[error("File name must start with a 7-digit contract id: {name}")]
    InvalidFilename {
        /// The offending base name.
        name: String,
    },

    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for display.
        body: String,
    },

    /// Authentication is enabled but no session is available.
    #[error("Not authenticated")]
    AuthRequired,

    /// The identity provider rejected the credentials or refresh token.
    #[error("Authentication failed: {reason}")]
    AuthFailed {
        /// Human-readable rejection reason.
        reason: String,
    },
}

/// Truncate a response body for inclusion in an error message.
///
/// Gateway error pages can be arbitrarily large; one line is enough
/// to diagnose most failures.
pub fn body_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let line = body.lines().next().unwrap_or("").trim();
    if line.len() > MAX {
        let mut end = MAX;
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &line[..end])
    } else {
        line.to_string()
    }
}
