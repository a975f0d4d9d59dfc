//! Utility functions and helper methods for the lobby engine.
//!
//! This module provides convenient factory functions for wiring a lobby
//! manager and command router together.

use crate::config::LobbyConfig;
use crate::error::LobbyError;
use crate::game::GameDescriptor;
use crate::gateway::ChannelGateway;
use crate::lobby::LobbyManager;
use crate::messaging::CommandRouter;
use std::sync::Arc;

/// Creates a lobby manager after validating the configuration.
///
/// # Arguments
///
/// * `config` - Channel registry, moderators and command prefix
/// * `descriptor` - The game this lobby assembles players for
/// * `gateway` - The transport's channel capabilities
///
/// # Example
///
/// ```rust
/// use lobby_server::{create_lobby, GameDescriptor, LobbyConfig, MemoryGateway};
/// use std::sync::Arc;
///
/// let game = GameDescriptor::new("Example Game", 2, 3).unwrap();
/// let lobby = create_lobby(
///     LobbyConfig::with_channels(["#test"]),
///     game,
///     Arc::new(MemoryGateway::new()),
/// )
/// .unwrap();
/// assert_eq!(lobby.descriptor().max_players(), 3);
/// ```
pub fn create_lobby(
    config: LobbyConfig,
    descriptor: GameDescriptor,
    gateway: Arc<dyn ChannelGateway>,
) -> Result<LobbyManager, LobbyError> {
    config.validate()?;
    Ok(LobbyManager::new(config, descriptor, gateway))
}

/// Creates a command router over a freshly built lobby manager.
///
/// This is what a transport integration normally needs: feed it chat lines
/// with [`CommandRouter::dispatch_text`] and send back what it returns.
pub fn create_router(
    config: LobbyConfig,
    descriptor: GameDescriptor,
    gateway: Arc<dyn ChannelGateway>,
) -> Result<CommandRouter, LobbyError> {
    let manager = create_lobby(config, descriptor, gateway)?;
    Ok(CommandRouter::new(Arc::new(manager)))
}
