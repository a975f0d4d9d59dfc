//! Command outcomes.
//!
//! Every lobby operation ends in exactly one [`Outcome`]. Rendering outcomes
//! into chat lines is the reply formatter's job.

use super::session::{Player, SessionSnapshot};

/// Why a command was refused. Refusals never mutate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Command came by private message without a usable channel
    MissingChannel,
    /// Target channel is not in the channel registry
    InvalidChannel { channel: String },
    /// Speaker is not present in the target channel
    NotInChannel { channel: String },
    /// Non-member tried to join a started game
    AlreadyStarted,
    /// Member tried to join again while forming
    AlreadyJoined { channel: String },
    /// Roster is at the game's maximum
    GameFull,
    /// Member tried to leave a started game
    CannotLeaveInProgress,
    /// Non-member tried to start the game
    NotInGame,
    /// Roster is below the game's minimum
    NotEnoughPlayers,
}

/// Result of applying one command to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Validation failed
    Rejected(Rejection),
    /// Nothing to do and nothing to say
    Silent,
    /// A player was added
    Joined {
        channel: String,
        player: Player,
        count: usize,
    },
    /// A player was removed
    Left {
        channel: String,
        player: Player,
        count: usize,
    },
    /// The session moved to `Started`; carries the start hook's announcements
    Started {
        channel: String,
        announcements: Vec<String>,
    },
    /// Roster listing
    Who(SessionSnapshot),
    /// Session summary
    Status(SessionSnapshot),
}
