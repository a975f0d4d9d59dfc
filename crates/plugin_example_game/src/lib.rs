use lobby_server::{GameDescriptor, LobbyError, StartContext};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Example Game
// ============================================================================

pub const GAME_NAME: &str = "Example Game";
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 3;

/// A minimal game that only announces its players once the lobby starts it.
///
/// The lobby owns everything up to the start transition; after that the
/// roster is handed over through the start hook and this type keeps a tally
/// of how many games it has been asked to run.
#[derive(Debug, Clone)]
pub struct ExampleGame {
    name: String,
    games_started: Arc<AtomicU32>,
}

impl ExampleGame {
    pub fn new() -> Self {
        info!("🎉 ExampleGame: Creating new instance");
        Self {
            name: GAME_NAME.to_string(),
            games_started: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Builds the descriptor the lobby is configured with.
    ///
    /// Every descriptor built from the same `ExampleGame` shares its start
    /// counter.
    pub fn descriptor(&self) -> Result<GameDescriptor, LobbyError> {
        let counter = Arc::clone(&self.games_started);
        let name = self.name.clone();

        let descriptor = GameDescriptor::new(&self.name, MIN_PLAYERS, MAX_PLAYERS)?
            .with_start_hook(move |ctx| {
                let number = counter.fetch_add(1, Ordering::Relaxed) + 1;
                info!(
                    "🎮 ExampleGame: Game #{} starting in {} with {} players",
                    number,
                    ctx.channel,
                    ctx.players.len()
                );
                vec![announcement(&name, ctx)]
            });
        Ok(descriptor)
    }

    /// Number of games started through descriptors built by this instance.
    pub fn games_started(&self) -> u32 {
        self.games_started.load(Ordering::Relaxed)
    }
}

impl Default for ExampleGame {
    fn default() -> Self {
        Self::new()
    }
}

fn announcement(name: &str, ctx: &StartContext<'_>) -> String {
    let players = ctx
        .players
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{name} has started! Players: {players}")
}
