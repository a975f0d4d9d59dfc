//! Configuration management for the lobby bot.
//!
//! This module handles loading, validation, and conversion of bot configuration
//! from TOML files and command-line arguments.

use lobby_server::LobbyConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_stats_interval() -> u64 {
    60
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Lobby engine settings
    pub lobby: LobbySettings,
    /// Logging configuration settings
    pub logging: LoggingSettings,
}

/// Lobby-specific configuration settings.
///
/// Controls which channels host games, who the privileged users are, and how
/// commands are recognized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbySettings {
    /// Channels the lobby runs games in
    pub channels: Vec<String>,
    /// Privileged users (account or nick)
    #[serde(default)]
    pub moderators: Vec<String>,
    /// Prefix that marks a chat line as a command
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Seconds between lobby health reports
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lobby: LobbySettings {
                channels: vec!["#lobby".to_string()],
                moderators: vec![],
                command_prefix: default_command_prefix(),
                stats_interval_secs: default_stats_interval(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file, creating a default file if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The loaded configuration, or an error if the file exists but cannot
    /// be read or parsed.
    pub async fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Converts the lobby section into the engine's configuration.
    pub fn to_lobby_config(&self) -> LobbyConfig {
        LobbyConfig {
            channels: self.lobby.channels.iter().cloned().collect(),
            moderators: self.lobby.moderators.iter().cloned().collect(),
            command_prefix: self.lobby.command_prefix.clone(),
        }
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is valid, or an error message describing
    /// the first validation failure encountered.
    pub fn validate(&self) -> Result<(), String> {
        if self.lobby.channels.is_empty() {
            return Err("At least one lobby channel must be configured".to_string());
        }

        if let Some(channel) = self
            .lobby
            .channels
            .iter()
            .find(|c| !c.starts_with('#') || c.chars().any(char::is_whitespace))
        {
            return Err(format!(
                "Invalid channel name: {channel:?} (must start with '#' and contain no whitespace)"
            ));
        }

        if self.lobby.stats_interval_secs == 0 {
            return Err("lobby.stats_interval_secs must be greater than 0".to_string());
        }

        self.to_lobby_config()
            .validate()
            .map_err(|e| e.to_string())?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};
    use tokio::fs;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.lobby.channels, vec!["#lobby"]);
        assert!(config.lobby.moderators.is_empty());
        assert_eq!(config.lobby.command_prefix, "!");
        assert_eq!(config.lobby.stats_interval_secs, 60);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lobby.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.lobby.channels, vec!["#lobby"]);

        // The default file is written out and loads back the same
        assert!(path.exists());
        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded.lobby.command_prefix, "!");
        assert_eq!(reloaded.logging.level, "info");
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r##"
[lobby]
channels = ["#test", "#games"]
moderators = ["test1"]
command_prefix = "@"
stats_interval_secs = 5

[logging]
level = "debug"
json_format = true
"##;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(&temp_file.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(config.lobby.channels, vec!["#test", "#games"]);
        assert_eq!(config.lobby.moderators, vec!["test1"]);
        assert_eq!(config.lobby.command_prefix, "@");
        assert_eq!(config.lobby.stats_interval_secs, 5);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_serde_deserialization_with_defaults() {
        let toml_content = r##"
[lobby]
channels = ["#test"]

[logging]
level = "info"
json_format = false
"##;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert!(config.lobby.moderators.is_empty());
        assert_eq!(config.lobby.command_prefix, "!");
        assert_eq!(config.lobby.stats_interval_secs, 60);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(toml::from_str::<AppConfig>("[lobby]\nchannels = \"#test\"").is_err());
    }

    #[test]
    fn test_to_lobby_config_conversion() {
        let mut config = AppConfig::default();
        config.lobby.channels = vec!["#b".to_string(), "#a".to_string(), "#a".to_string()];
        config.lobby.moderators = vec!["test1".to_string()];

        let lobby = config.to_lobby_config();
        assert_eq!(lobby.channels.len(), 2);
        assert!(lobby.is_registered("#a"));
        assert!(lobby.is_registered("#b"));
        assert!(lobby.moderators.contains("test1"));
        assert_eq!(lobby.command_prefix, "!");
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.lobby.channels.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.lobby.channels = vec!["lobby".to_string()];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.lobby.command_prefix = String::new();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.lobby.stats_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = AppConfig::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "{level} should be accepted");
        }
    }
}
