//! Main application logic and lifecycle management.
//!
//! This module contains the `Application` struct that wires the lobby engine,
//! the Example Game and the console transport together, then supervises them
//! until input ends or a shutdown signal arrives.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    console::ConsoleTransport,
    logging::display_banner,
    signals::{setup_signal_handlers, wait_for_signal, ShutdownState},
};
use lobby_server::{create_router, CommandRouter, LobbyManager, MemoryGateway};
use plugin_example_game::ExampleGame;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info, warn};

/// Main application struct.
///
/// # Architecture
///
/// * **Configuration Management**: Loads and validates configuration from files and CLI
/// * **Lobby Orchestration**: Builds the engine around the Example Game
/// * **Health Monitoring**: Periodic lobby statistics
/// * **Graceful Shutdown**: Handles termination signals and cleanup procedures
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// Router shared with the console transport
    router: CommandRouter,
    /// Presence and voice state behind the console
    gateway: Arc<MemoryGateway>,
    /// Game the lobby assembles players for
    game: ExampleGame,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Display startup banner
    /// 5. Build the lobby engine for the Example Game
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        apply_overrides(&mut config, args);

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        } else {
            info!("✅ Configuration loaded and validated successfully");
        }

        display_banner();

        let game = ExampleGame::new();
        let gateway = Arc::new(MemoryGateway::new());
        let router = create_router(config.to_lobby_config(), game.descriptor()?, gateway.clone())?;

        Ok(Self {
            config,
            router,
            gateway,
            game,
        })
    }

    /// Runs the bot until console input ends or a shutdown signal arrives.
    ///
    /// # Monitoring Features
    ///
    /// * **Configuration Summary**: Displays key settings at startup
    /// * **Periodic Health Reports**: Lobby statistics on a fixed interval
    /// * **Final Statistics**: Summary report during shutdown
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting Lobby Bot");
        self.log_configuration_summary();

        let shutdown_state = ShutdownState::new();
        let manager = Arc::clone(self.router.manager());

        let monitoring_handle = {
            let manager = Arc::clone(&manager);
            let period = tokio::time::Duration::from_secs(self.config.lobby.stats_interval_secs);

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                // The first tick completes immediately
                interval.tick().await;

                loop {
                    interval.tick().await;

                    let stats = manager.stats().await;
                    info!(
                        "📊 Lobby Health - {} sessions ({} forming, {} started) | {} players seated",
                        stats.sessions, stats.forming, stats.started, stats.players
                    );
                }
            })
        };

        let mut console_handle = {
            let console = ConsoleTransport::new(
                self.router.clone(),
                Arc::clone(&self.gateway),
                shutdown_state.clone(),
            );

            tokio::spawn(async move {
                let stdin = BufReader::new(tokio::io::stdin());
                if let Err(e) = console.run(stdin, tokio::io::stdout()).await {
                    error!("❌ Console transport failed: {}", e);
                }
            })
        };

        info!("✅ Lobby Bot is now running!");
        info!(
            "🔍 Health monitoring active - stats every {} seconds",
            self.config.lobby.stats_interval_secs
        );
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        tokio::select! {
            result = setup_signal_handlers(&shutdown_state) => result?,
            _ = &mut console_handle => {
                info!("📭 Console finished - shutting down");
                shutdown_state.initiate_shutdown();
            }
        }

        // A second signal skips the graceful path
        tokio::spawn(async move {
            if let Err(e) = wait_for_signal().await {
                error!("Failed to set up merciless shutdown signal handler: {e}");
                return;
            }

            warn!("Shutdown handler received again! I'll make this quick.");
            std::process::exit(1);
        });

        info!("🛑 Beginning graceful shutdown...");
        monitoring_handle.abort();
        console_handle.abort();

        log_final_statistics(&manager, &self.game).await;

        info!("✅ Lobby Bot shutdown complete");
        Ok(())
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        let descriptor = self.router.manager().descriptor();
        info!("📋 Configuration Summary:");
        info!("  💬 Channels: {}", self.config.lobby.channels.join(", "));
        info!("  ⌨️ Command prefix: {}", self.config.lobby.command_prefix);
        info!(
            "  🎲 Game: {} ({}-{} players)",
            descriptor.name(),
            descriptor.min_players(),
            descriptor.max_players()
        );
        info!("  🛡️ Moderators: {}", self.config.lobby.moderators.len());
    }
}

/// Applies command-line overrides on top of the file configuration.
fn apply_overrides(config: &mut AppConfig, args: CliArgs) {
    if !args.channels.is_empty() {
        config.lobby.channels = args.channels;
    }

    if let Some(prefix) = args.prefix {
        config.lobby.command_prefix = prefix;
    }

    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }

    if args.json_logs {
        config.logging.json_format = true;
    }
}

/// Logs final statistics during shutdown.
async fn log_final_statistics(manager: &LobbyManager, game: &ExampleGame) {
    let stats = manager.stats().await;
    info!("📊 Final Statistics:");
    info!("  - Open sessions: {}", stats.sessions);
    info!("  - Players seated: {}", stats.players);
    info!("  - Games started: {}", game.games_started());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(config_path: PathBuf) -> CliArgs {
        CliArgs {
            config_path,
            channels: vec![],
            prefix: None,
            log_level: None,
            json_logs: false,
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        let mut cli = args(PathBuf::from("unused.toml"));
        cli.channels = vec!["#test".to_string(), "#games".to_string()];
        cli.prefix = Some("@".to_string());
        cli.log_level = Some("debug".to_string());
        cli.json_logs = true;

        apply_overrides(&mut config, cli);
        assert_eq!(config.lobby.channels, vec!["#test", "#games"]);
        assert_eq!(config.lobby.command_prefix, "@");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, args(PathBuf::from("unused.toml")));
        assert_eq!(config.lobby.channels, vec!["#lobby"]);
        assert_eq!(config.lobby.command_prefix, "!");
    }

    #[tokio::test]
    async fn test_application_creation() {
        let dir = TempDir::new().unwrap();
        let mut cli = args(dir.path().join("lobby.toml"));
        cli.channels = vec!["#test".to_string()];

        let app = Application::new(cli).await.unwrap();
        assert!(app.router.manager().config().is_registered("#test"));
        assert!(!app.router.manager().config().is_registered("#lobby"));
        assert_eq!(app.router.manager().descriptor().name(), "Example Game");
    }

    #[tokio::test]
    async fn test_application_rejects_invalid_override() {
        let dir = TempDir::new().unwrap();
        let mut cli = args(dir.path().join("lobby.toml"));
        cli.channels = vec!["no-hash".to_string()];

        assert!(Application::new(cli).await.is_err());
    }
}
