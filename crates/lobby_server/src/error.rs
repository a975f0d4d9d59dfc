//! Error types and handling for the lobby engine.
//!
//! Only unexpected failures are represented here. A command that fails
//! validation (wrong channel, full game, ...) is ordinary control flow and is
//! reported as a [`crate::lobby::Rejection`] instead.

/// Enumeration of fatal lobby errors.
///
/// These are propagated to the host runtime; nothing inside the engine
/// retries or recovers from them.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// A channel gateway call failed while applying a command
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Session state broke one of its invariants
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The game descriptor has inconsistent player bounds
    #[error("Invalid game descriptor: {0}")]
    InvalidDescriptor(String),

    /// The lobby configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures reported by a [`crate::gateway::ChannelGateway`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The transport cannot act on the channel (not joined, no privileges, ...)
    #[error("Channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// Any other transport-level failure
    #[error("Transport error: {0}")]
    Transport(String),
}
