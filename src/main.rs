//! FinPasser Console - CLI entry point
//!
//! This binary provides the command-line interface for the FinPasser
//! operator console: the interactive dashboard, one-shot uploads, and
//! configuration management.

use clap::{Parser, Subcommand};
use finpasser_console::api::auth::{password_from_env, AuthClient, PASSWORD_ENV};
use finpasser_console::api::GatewayClient;
use finpasser_console::config::{Config, ConfigLoader};
use finpasser_console::{logging, tui::App};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// FinPasser operator console
#[derive(Parser)]
#[command(name = "fpc")]
#[command(version, about = "Operator console for the FinPasser payment gateway")]
struct Cli {
    /// Path to a configuration file (overrides the default location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the fpc CLI
#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal dashboard
    Tui,

    /// Upload a pain.001 XML file and print the gateway receipt
    Upload {
        /// Path to the XML file; its name must start with a 7-digit contract id
        file: PathBuf,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tui => {
            let config = match load_config(cli.config.as_deref()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Config error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            logging::init_tui(config.log.level);
            let rt =
                tokio::runtime::Runtime::new().expect("failed to create tokio runtime for TUI");
            if let Err(e) = rt.block_on(async {
                let mut app = App::new(config);
                app.run().await
            }) {
                eprintln!("TUI error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        Commands::Upload { file } => {
            let config = match load_config(cli.config.as_deref()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Config error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            logging::init_cli(config.log.level);
            let rt =
                tokio::runtime::Runtime::new().expect("failed to create tokio runtime for upload");
            return rt.block_on(run_upload_command(config, &file));
        }
        Commands::Config { action } => {
            use finpasser_console::config::{default, xdg};
            let result = match action {
                ConfigAction::Init { force } => match default::create_default_config(force) {
                    Ok(path) => {
                        println!("Created configuration at {}", path.display());
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                ConfigAction::Path => {
                    println!("{}", xdg::config_path().display());
                    Ok(())
                }
                ConfigAction::Validate => match load_config(cli.config.as_deref()) {
                    Ok(config) => {
                        println!("Configuration is valid");
                        println!("{config:#?}");
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
            };
            if let Err(e) = result {
                eprintln!("Config error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Loads configuration from the override path when given, the default XDG
/// location otherwise.
fn load_config(
    override_path: Option<&Path>,
) -> Result<Config, finpasser_console::config::ConfigError> {
    match override_path {
        Some(path) => ConfigLoader::load_from_path(path),
        None => ConfigLoader::load_default(),
    }
}

/// One-shot upload: optional login, send the file, print the receipt.
async fn run_upload_command(config: Config, file: &Path) -> ExitCode {
    let token = if config.auth.enabled {
        let Some(password) = password_from_env() else {
            eprintln!("Upload failed: {PASSWORD_ENV} is not set");
            return ExitCode::FAILURE;
        };
        let auth = AuthClient::new(config.auth.clone());
        match auth.login(&password).await {
            Ok(session) => Some(session.access_token),
            Err(e) => {
                eprintln!("Upload failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let gateway = GatewayClient::new(&config.api);
    match gateway.upload(file, token.as_deref()).await {
        Ok(receipt) => {
            println!("{receipt}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Upload failed: {e}");
            ExitCode::FAILURE
        }
    }
}
