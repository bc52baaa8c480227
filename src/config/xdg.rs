//! Platform-aware path resolution for the FinPasser console.
//!
//! On **Linux**, follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/finpasser-console` or `~/.config/finpasser-console`
//! - State (layout, logs): `$XDG_STATE_HOME/finpasser-console` or `~/.local/state/finpasser-console`
//!
//! On **macOS**, uses Apple conventions with XDG env var overrides.

use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "finpasser-console";

/// Returns the configuration directory for the console.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/finpasser-console` (if env var set, any platform)
/// 2. Platform default:
///    - Linux: `~/.config/finpasser-console`
///    - macOS: `~/Library/Application Support/finpasser-console`
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    platform_config_dir().join(APP_NAME)
}

/// Platform-native config base directory (without XDG override).
fn platform_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::config_dir().expect("could not determine config directory")
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::home_dir()
            .expect("could not determine home directory")
            .join(".config")
    }
}

/// Returns the path to the main configuration file.
///
/// Resolves to `config_dir()/config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns the state directory for session-scoped data (persisted layout,
/// TUI log file).
///
/// Resolution order:
/// 1. `$XDG_STATE_HOME/finpasser-console` (if env var set, any platform)
/// 2. Platform default:
///    - Linux: `~/.local/state/finpasser-console`
///    - macOS: `~/Library/Application Support/finpasser-console`
pub fn state_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    #[cfg(target_os = "macos")]
    {
        dirs::config_dir()
            .expect("could not determine state directory")
            .join(APP_NAME)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::home_dir()
            .expect("could not determine home directory")
            .join(".local/state")
            .join(APP_NAME)
    }
}

/// Returns the path of the TUI log file under the state directory.
pub fn log_path() -> PathBuf {
    state_dir().join("fpc.log")
}

/// Creates a directory and all parent directories with mode 0700.
///
/// Equivalent to `mkdir -p` with restricted permissions.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Creates the configuration directory if it does not exist, returning its path.
pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir();
    ensure_dir(&dir)?;
    Ok(dir)
}
