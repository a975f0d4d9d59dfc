//! Statistics tracking for the lobby.

use serde::{Deserialize, Serialize};

/// Point-in-time view of every session the lobby owns
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyStats {
    /// Sessions that are not logically absent
    pub sessions: usize,
    /// Sessions still accepting players
    pub forming: usize,
    /// Sessions with a locked roster
    pub started: usize,
    /// Players across all sessions
    pub players: usize,
}
