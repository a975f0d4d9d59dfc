//! Game descriptors.
//!
//! A game plugs into the lobby as plain data: a name, player bounds and a
//! start hook. The lobby never needs to know anything else about the game,
//! so there is no trait hierarchy to implement.

use crate::error::LobbyError;
use crate::lobby::Player;
use std::fmt;
use std::sync::Arc;

/// Hook invoked once when a session transitions to `Started`.
///
/// Returned lines are announced in the session's channel.
pub type StartHook = Arc<dyn Fn(&StartContext<'_>) -> Vec<String> + Send + Sync>;

/// Information handed to a [`StartHook`].
#[derive(Debug, Clone, Copy)]
pub struct StartContext<'a> {
    /// Channel the game is starting in
    pub channel: &'a str,
    /// Final roster, in join order
    pub players: &'a [Player],
}

/// Immutable capability record describing one game.
#[derive(Clone)]
pub struct GameDescriptor {
    name: String,
    min_players: usize,
    max_players: usize,
    on_start: StartHook,
}

impl GameDescriptor {
    /// Creates a descriptor with the given player bounds and a start hook
    /// that announces nothing.
    ///
    /// # Errors
    ///
    /// Returns `LobbyError::InvalidDescriptor` if the name is empty,
    /// `min_players` is zero, or `max_players < min_players`.
    pub fn new(
        name: impl Into<String>,
        min_players: usize,
        max_players: usize,
    ) -> Result<Self, LobbyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LobbyError::InvalidDescriptor(
                "Game name cannot be empty".to_string(),
            ));
        }
        if min_players == 0 {
            return Err(LobbyError::InvalidDescriptor(format!(
                "{name}: min_players must be at least 1"
            )));
        }
        if max_players < min_players {
            return Err(LobbyError::InvalidDescriptor(format!(
                "{name}: max_players ({max_players}) is below min_players ({min_players})"
            )));
        }

        Ok(Self {
            name,
            min_players,
            max_players,
            on_start: Arc::new(|_: &StartContext<'_>| Vec::new()),
        })
    }

    /// Replaces the start hook.
    pub fn with_start_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StartContext<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        self.on_start = Arc::new(hook);
        self
    }

    /// Display name of the game.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fewest players a game can start with.
    pub fn min_players(&self) -> usize {
        self.min_players
    }

    /// Most players a roster may hold.
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Runs the start hook.
    pub fn on_start(&self, context: &StartContext<'_>) -> Vec<String> {
        (self.on_start)(context)
    }
}

impl fmt::Debug for GameDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameDescriptor")
            .field("name", &self.name)
            .field("min_players", &self.min_players)
            .field("max_players", &self.max_players)
            .finish_non_exhaustive()
    }
}
