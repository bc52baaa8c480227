//! TOML configuration schema for the FinPasser console.
//!
//! All structs derive `Deserialize` and `Serialize` with sensible defaults
//! via `#[serde(default)]`, so a partial (or absent) file always yields a
//! usable configuration. Keys are kebab-case.
//!
//! Duration fields use human-readable strings (e.g. `"250ms"`) parsed by the
//! `humantime` crate at the call site.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration encompassing all sections.
///
/// Corresponds to the full TOML file structure:
/// ```toml
/// [api]
/// [auth]
/// [tui]
/// [log]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Gateway endpoint settings.
    pub api: ApiConfig,
    /// Identity-provider settings.
    pub auth: AuthConfig,
    /// Dashboard appearance and behavior settings.
    pub tui: TuiConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// Gateway endpoint configuration from the `[api]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Base URL of the gateway.
    pub base_url: String,
    /// Path of the multipart upload endpoint, joined onto `base_url`.
    pub upload_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            upload_path: "/api/upload".to_string(),
        }
    }
}

/// Identity-provider configuration from the `[auth]` section.
///
/// Disabled by default so the console runs against unsecured dev gateways.
/// The password is never read from the file; it comes from the
/// `FPC_AUTH_PASSWORD` environment variable only.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AuthConfig {
    /// Whether to authenticate before uploading.
    pub enabled: bool,
    /// Issuer base URL (Keycloak server).
    pub issuer_url: String,
    /// Realm name.
    pub realm: String,
    /// OAuth client id for the password grant.
    pub client_id: String,
    /// Username for the password grant.
    pub username: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            issuer_url: "http://keycloak:8085".to_string(),
            realm: "finpasser".to_string(),
            client_id: "finpasser-console".to_string(),
            username: String::new(),
        }
    }
}

/// Dashboard configuration from the `[tui]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct TuiConfig {
    /// Grid column count.
    pub columns: u16,
    /// Render tick rate as a human-readable duration (e.g. `"250ms"`).
    pub tick_rate: String,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            tick_rate: "250ms".to_string(),
        }
    }
}

impl TuiConfig {
    /// Tick rate parsed as a duration, falling back to 250 ms on an
    /// unparsable value.
    pub fn tick_rate_duration(&self) -> Duration {
        humantime::parse_duration(&self.tick_rate).unwrap_or_else(|_| {
            tracing::warn!("invalid tui.tick-rate {:?}, using 250ms", self.tick_rate);
            Duration::from_millis(250)
        })
    }
}

/// Logging configuration from the `[log]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogConfig {
    /// Verbosity when `FPC_LOG` is unset.
    pub level: LogLevel,
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive string for `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config_all_fields() {
        let toml_str = r#"
[api]
base-url = "https://gateway.example.com"
upload-path = "/v2/upload"

[auth]
enabled = true
issuer-url = "https://id.example.com"
realm = "prod"
client-id = "console"
username = "ops"

[tui]
columns = 6
tick-rate = "100ms"

[log]
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).expect("valid TOML should parse");
        assert_eq!(config.api.base_url, "https://gateway.example.com");
        assert_eq!(config.api.upload_path, "/v2/upload");
        assert!(config.auth.enabled);
        assert_eq!(config.auth.realm, "prod");
        assert_eq!(config.auth.username, "ops");
        assert_eq!(config.tui.columns, 6);
        assert_eq!(config.tui.tick_rate, "100ms");
        assert_eq!(config.log.level, LogLevel::Debug);
    }

    #[test]
    fn parse_empty_string_uses_all_defaults() {
        let config: Config = toml::from_str("").expect("empty string should parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parse_unknown_fields_are_ignored() {
        let toml_str = r#"
unknown_key = "hello"

[tui]
future-field = 42
"#;
        let config: Config = toml::from_str(toml_str).expect("unknown fields should be ignored");
        assert_eq!(config.tui.columns, 4);
    }

    #[test]
    fn default_api_targets_local_gateway() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8081");
        assert_eq!(config.api.upload_path, "/api/upload");
    }

    #[test]
    fn default_auth_is_disabled() {
        let config = Config::default();
        assert!(!config.auth.enabled);
        assert_eq!(config.auth.realm, "finpasser");
        assert_eq!(config.auth.client_id, "finpasser-console");
    }

    #[test]
    fn default_grid_is_four_columns() {
        assert_eq!(Config::default().tui.columns, 4);
    }

    #[test]
    fn default_tick_rate_parses_to_250ms() {
        let config = Config::default();
        assert_eq!(config.tui.tick_rate_duration(), Duration::from_millis(250));
    }

    #[test]
    fn invalid_tick_rate_falls_back_to_250ms() {
        let tui = TuiConfig {
            tick_rate: "not a duration".to_string(),
            ..TuiConfig::default()
        };
        assert_eq!(tui.tick_rate_duration(), Duration::from_millis(250));
    }

    #[test]
    fn log_level_all_variants() {
        for (input, expected) in [
            ("error", LogLevel::Error),
            ("warn", LogLevel::Warn),
            ("info", LogLevel::Info),
            ("debug", LogLevel::Debug),
            ("trace", LogLevel::Trace),
        ] {
            let toml_str = format!("level = \"{}\"", input);
            let log: LogConfig = toml::from_str(&toml_str).expect("log level should parse");
            assert_eq!(log.level, expected);
            assert_eq!(log.level.as_directive(), input);
        }
    }

    #[test]
    fn invalid_log_level_returns_error() {
        let result: Result<LogConfig, _> = toml::from_str(r#"level = "verbose""#);
        assert!(result.is_err());
    }

    #[test]
    fn roundtrip_serialize_deserialize() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).expect("serialization should succeed");
        let parsed: Config = toml::from_str(&toml_str).expect("roundtrip should parse");
        assert_eq!(config, parsed);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[auth]
enabled = true
"#;
        let config: Config = toml::from_str(toml_str).expect("partial config should parse");
        assert!(config.auth.enabled);
        assert_eq!(config.auth.issuer_url, "http://keycloak:8085");
        assert_eq!(config.tui.columns, 4);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn keys_serialize_as_kebab_case() {
        let toml_str = toml::to_string(&Config::default()).expect("serialization should succeed");
        assert!(toml_str.contains("base-url"), "toml: {toml_str}");
        assert!(toml_str.contains("tick-rate"), "toml: {toml_str}");
        assert!(!toml_str.contains("base_url"), "toml: {toml_str}");
    }
}
