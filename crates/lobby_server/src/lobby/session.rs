//! Per-channel session state.
//!
//! A session holds the roster of one channel and the phase it is in. All
//! mutation goes through the lobby manager while the session lock is held.

use crate::error::LobbyError;
use crate::identity::{self, PlayerKey, Speaker};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a session. Transitions only `Forming` -> `Started`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting joins and leaves
    Forming,
    /// Roster is locked
    Started,
}

/// A roster entry.
///
/// Two players with the same key are the same player, whatever name they
/// joined under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    key: PlayerKey,
    name: String,
}

impl Player {
    /// Builds the roster entry for a speaker, keeping its current nick for
    /// replies.
    pub fn from_speaker(speaker: &Speaker) -> Self {
        Self {
            key: identity::resolve(speaker),
            name: speaker.nick.clone(),
        }
    }

    /// Membership key.
    pub fn key(&self) -> &PlayerKey {
        &self.key
    }

    /// Display name used in replies.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Roster and phase for one channel.
#[derive(Debug)]
pub struct Session {
    channel: String,
    players: Vec<Player>,
    phase: Phase,
}

impl Session {
    pub(crate) fn new(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            players: Vec::new(),
            phase: Phase::Forming,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// An empty forming session behaves exactly like no session at all.
    pub fn is_absent(&self) -> bool {
        self.is_empty() && self.phase == Phase::Forming
    }

    pub fn contains(&self, key: &PlayerKey) -> bool {
        self.players.iter().any(|p| p.key() == key)
    }

    /// Appends a player, returning the new roster size.
    ///
    /// Callers validate first; an `Err` here means the lobby logic is broken.
    pub(crate) fn add(&mut self, player: Player, max_players: usize) -> Result<usize, LobbyError> {
        if self.phase == Phase::Started {
            return Err(LobbyError::InvariantViolation(format!(
                "add to started session {}",
                self.channel
            )));
        }
        if self.contains(player.key()) {
            return Err(LobbyError::InvariantViolation(format!(
                "duplicate player {} in {}",
                player.key(),
                self.channel
            )));
        }
        if self.players.len() >= max_players {
            return Err(LobbyError::InvariantViolation(format!(
                "{} would exceed {max_players} players",
                self.channel
            )));
        }
        self.players.push(player);
        Ok(self.players.len())
    }

    /// Removes a player by key, preserving the order of the others.
    pub(crate) fn remove(&mut self, key: &PlayerKey) -> Result<Option<Player>, LobbyError> {
        if self.phase == Phase::Started {
            return Err(LobbyError::InvariantViolation(format!(
                "remove from started session {}",
                self.channel
            )));
        }
        Ok(self
            .players
            .iter()
            .position(|p| p.key() == key)
            .map(|index| self.players.remove(index)))
    }

    pub(crate) fn start(&mut self) {
        self.phase = Phase::Started;
    }

    /// Copies the current state out of the lock.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            channel: self.channel.clone(),
            phase: self.phase,
            players: self.players.clone(),
        }
    }
}

/// Read-only copy of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub channel: String,
    pub phase: Phase,
    pub players: Vec<Player>,
}

impl SessionSnapshot {
    /// Snapshot of a channel that has no session.
    pub fn empty(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            phase: Phase::Forming,
            players: Vec::new(),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.players.is_empty() && self.phase == Phase::Forming
    }

    /// Player names in join order.
    pub fn names(&self) -> Vec<&str> {
        self.players.iter().map(Player::name).collect()
    }
}
