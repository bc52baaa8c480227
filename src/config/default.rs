//! Default configuration template and file creation utilities.
//!
//! Provides a well-commented TOML template that matches `Config::default()`
//! and functions to write it to the XDG config path.

use std::fs;
use std::path::PathBuf;

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A well-commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
/// Sections: `[api]`, `[auth]`, `[tui]`, `[log]`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# FinPasser Console Configuration
#
# This file was auto-generated with default values.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/finpasser-console/config.toml

# ==============================================================================
# Gateway API
# ==============================================================================

[api]

# Base URL of the FinPasser payment gateway.
base-url = "http://localhost:8081"

# Path of the multipart upload endpoint, joined onto base-url.
upload-path = "/api/upload"

# ==============================================================================
# Authentication
# ==============================================================================

[auth]

# Authenticate against the identity provider before uploading.
# Leave disabled for unsecured development gateways.
enabled = false

# Issuer base URL (Keycloak server).
issuer-url = "http://keycloak:8085"

# Realm name.
realm = "finpasser"

# OAuth client id used for the password grant.
client-id = "finpasser-console"

# Username for the password grant.
# The password is NEVER read from this file; export FPC_AUTH_PASSWORD instead.
username = ""

# ==============================================================================
# Dashboard
# ==============================================================================

[tui]

# Number of grid columns on the dashboard.
columns = 4

# Render tick rate as a human-readable duration.
# Controls how often the TUI redraws. Lower values = smoother but more CPU.
# Examples: "250ms", "500ms", "1s"
tick-rate = "250ms"

# ==============================================================================
# Logging
# ==============================================================================

[log]

# Logging verbosity level when FPC_LOG is unset.
# Options: "error", "warn", "info", "debug", "trace"
level = "info"
"#;

// ---------------------------------------------------------------------------
// File creation functions
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the default config file.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists { path: path.clone() });
        }
        // Back up existing file
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &PathBuf) -> Result<(), ConfigError> {
    xdg::ensure_config_dir().map_err(|e| ConfigError::WriteError {
        path: path.clone(),
        source: e,
    })?;

    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| ConfigError::WriteError {
        path: path.clone(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
            ConfigError::WriteError {
                path: path.clone(),
                source: e,
            }
        })?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
