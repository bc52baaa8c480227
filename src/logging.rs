//! Logging initialization for the FinPasser console.
//!
//! Configures the `tracing` subscriber with level filtering via the `FPC_LOG`
//! environment variable, falling back to the configured `[log] level` when
//! the variable is unset.
//!
//! # Usage
//!
//! ```bash
//! # Default (config file level, "info" out of the box)
//! fpc tui
//!
//! # Debug level
//! FPC_LOG=debug fpc upload payment.xml
//!
//! # Module-specific filtering
//! FPC_LOG=finpasser_console=debug,warn fpc tui
//! ```

use std::fs::OpenOptions;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LogLevel;
use crate::config::xdg;

/// Initialize the tracing subscriber for CLI commands.
///
/// Reads the `FPC_LOG` environment variable for filter directives and falls
/// back to `level` from the configuration. Output goes to stderr.
///
/// # Panics
///
/// Panics if a global subscriber has already been set (should only be
/// called once, at startup).
pub fn init_cli(level: LogLevel) {
    fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the tracing subscriber for the TUI.
///
/// The TUI owns the alternate screen, so stderr output would corrupt the
/// display. Logs go to `fpc.log` under the state directory instead. If the
/// log file cannot be opened, logging is disabled rather than failing the
/// dashboard.
pub fn init_tui(level: LogLevel) {
    let path = xdg::log_path();
    if let Some(parent) = path.parent() {
        if xdg::ensure_dir(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(file)
        .init();
}

fn filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env("FPC_LOG").unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}
