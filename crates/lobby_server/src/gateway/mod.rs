//! # Channel Gateway Interface
//!
//! The gateway is the lobby's only way of acting on the chat network. It
//! answers presence questions and controls who may speak in a channel.
//!
//! ## When the lobby calls it
//!
//! - **Presence** - `has_user` during `join` validation
//! - **Voice** - after a successful `join`
//! - **Devoice** - after a successful `leave`
//! - **Moderation** - when a game starts
//!
//! Calls are made while the channel's session is locked, so side effects for
//! one channel are always issued in command order. Errors are fatal for the
//! command in progress and are propagated unchanged.

use crate::error::GatewayError;
use crate::identity::Speaker;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod memory;

pub use memory::{GatewayEvent, MemoryGateway};

/// Capability the lobby needs from the chat transport.
///
/// # Examples
///
/// ```rust,no_run
/// use lobby_server::{ChannelGateway, GatewayError, Speaker};
///
/// #[derive(Debug)]
/// struct NullGateway;
///
/// #[lobby_server::async_trait]
/// impl ChannelGateway for NullGateway {
///     async fn has_user(&self, _channel: &str, _user: &Speaker) -> Result<bool, GatewayError> {
///         Ok(true)
///     }
///     async fn voice(&self, _channel: &str, _user: &Speaker) -> Result<(), GatewayError> {
///         Ok(())
///     }
///     async fn devoice(&self, _channel: &str, _user: &Speaker) -> Result<(), GatewayError> {
///         Ok(())
///     }
///     async fn set_moderated(&self, _channel: &str, _moderated: bool) -> Result<(), GatewayError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ChannelGateway: Send + Sync + Debug {
    /// Returns true if `user` is currently present in `channel`.
    async fn has_user(&self, channel: &str, user: &Speaker) -> Result<bool, GatewayError>;

    /// Grants `user` speaking rights in `channel`.
    async fn voice(&self, channel: &str, user: &Speaker) -> Result<(), GatewayError>;

    /// Revokes `user`'s speaking rights in `channel`.
    async fn devoice(&self, channel: &str, user: &Speaker) -> Result<(), GatewayError>;

    /// Turns channel moderation on or off.
    async fn set_moderated(&self, channel: &str, moderated: bool) -> Result<(), GatewayError>;
}
