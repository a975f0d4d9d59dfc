//! # Lobby Bot
//!
//! Host application for the lobby engine. Handles CLI parsing, configuration
//! loading, logging, and application lifecycle, and drives the engine through
//! a console transport.
//!
//! ## Configuration
//!
//! The bot loads configuration from a TOML file (default: `config.toml`).
//! If the file doesn't exist, a default configuration will be created:
//!
//! ```toml
//! [lobby]
//! channels = ["#lobby"]
//! moderators = []
//! command_prefix = "!"
//! stats_interval_secs = 60
//!
//! [logging]
//! level = "info"
//! json_format = false
//! ```
//!
//! ## Signal Handling
//!
//! The bot handles graceful shutdown on:
//! - SIGINT (Ctrl+C)
//! - SIGTERM (Unix systems)
//!
//! A second signal exits immediately.

use tracing::error;

pub mod app;
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Entry point for the lobby bot.
///
/// Handles the complete application lifecycle:
/// 1. Command-line argument parsing
/// 2. Configuration loading and validation
/// 3. Logging system initialization
/// 4. Application creation and execution
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
///
/// Called from `main` under `#[tokio::main]`.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Logging settings come from the file before CLI overrides are merged
    let config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default();

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let log_settings = LoggingSettings {
        level,
        json_format: config.logging.json_format,
    };
    if let Err(e) = logging::setup_logging(&log_settings, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub use config::{LobbySettings, LoggingSettings};
pub use console::{format_delivery, parse_line, ConsoleLine, ConsoleTransport};
pub use signals::ShutdownState;
