//! Lobby state machine.
//!
//! This module holds per-channel sessions, the outcomes of applying commands
//! to them, and the manager that serializes access to each session.

pub mod manager;
pub mod outcome;
pub mod session;
pub mod stats;

pub use manager::LobbyManager;
pub use outcome::{Outcome, Rejection};
pub use session::{Phase, Player, Session, SessionSnapshot};
pub use stats::LobbyStats;
