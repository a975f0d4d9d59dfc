//! Lobby configuration types and defaults.
//!
//! This module contains the engine configuration supplied by the surrounding
//! bot setup: which channels the lobby operates on, who the privileged users
//! are, and which prefix marks a chat line as a command.

use crate::error::LobbyError;
use crate::identity::{self, Speaker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration structure for the lobby engine.
///
/// # Fields
///
/// * `channels` - The channel registry; joins anywhere else are rejected
/// * `moderators` - Privileged player keys, reserved for administrative commands
/// * `command_prefix` - Leading text that marks a command (`!` by default)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyConfig {
    /// Channels the lobby is allowed to run games in
    pub channels: BTreeSet<String>,

    /// Privileged users (account or nick, matched against resolved player keys)
    pub moderators: BTreeSet<String>,

    /// Prefix that introduces a command in a chat line
    pub command_prefix: String,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            channels: BTreeSet::new(),
            moderators: BTreeSet::new(),
            command_prefix: "!".to_string(),
        }
    }
}

impl LobbyConfig {
    /// Creates a configuration operating on the given channels with defaults
    /// for everything else.
    pub fn with_channels<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Returns true if `channel` is part of the channel registry.
    pub fn is_registered(&self, channel: &str) -> bool {
        self.channels.contains(channel)
    }

    /// Returns true if the speaker resolves to a configured moderator.
    ///
    /// No lobby command consults this yet.
    pub fn is_moderator(&self, speaker: &Speaker) -> bool {
        self.moderators.contains(identity::resolve(speaker).as_str())
    }

    /// Validates the configuration for consistency.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the configuration is usable, or a `LobbyError::Config`
    /// describing the first problem found.
    pub fn validate(&self) -> Result<(), LobbyError> {
        if self.command_prefix.is_empty() {
            return Err(LobbyError::Config("Command prefix cannot be empty".to_string()));
        }
        if self.command_prefix.chars().any(char::is_whitespace) {
            return Err(LobbyError::Config(format!(
                "Command prefix cannot contain whitespace: {:?}",
                self.command_prefix
            )));
        }
        if let Some(bad) = self
            .channels
            .iter()
            .find(|c| c.is_empty() || c.chars().any(char::is_whitespace))
        {
            return Err(LobbyError::Config(format!("Invalid channel name: {bad:?}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LobbyConfig::default();
        assert!(config.channels.is_empty());
        assert!(config.moderators.is_empty());
        assert_eq!(config.command_prefix, "!");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_channels_registers() {
        let config = LobbyConfig::with_channels(["#test", "#other"]);
        assert!(config.is_registered("#test"));
        assert!(config.is_registered("#other"));
        assert!(!config.is_registered("#bogus"));
    }

    #[test]
    fn test_moderator_matches_resolved_key() {
        let mut config = LobbyConfig::with_channels(["#test"]);
        config.moderators.insert("test1".to_string());

        assert!(config.is_moderator(&Speaker::new("test1")));
        assert!(config.is_moderator(&Speaker::authenticated("someone_else", "test1")));
        assert!(!config.is_moderator(&Speaker::new("test2")));
    }

    #[test]
    fn test_validation_rejects_bad_prefix() {
        let mut config = LobbyConfig::default();
        config.command_prefix = String::new();
        assert!(config.validate().is_err());

        config.command_prefix = "! ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_channel() {
        let config = LobbyConfig::with_channels(["#fine", "#not fine"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("#not fine"));
    }
}
