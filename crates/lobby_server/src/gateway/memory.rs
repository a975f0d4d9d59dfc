//! In-memory channel gateway.
//!
//! Tracks channel presence, voice and moderation entirely in process. Used by
//! the console host, which has no real network behind it, and by tests that
//! need to assert which side effects a command produced.

use super::ChannelGateway;
use crate::error::GatewayError;
use crate::identity::Speaker;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::debug;

/// A side effect issued through the gateway, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// `nick` was granted speaking rights in `channel`
    Voice { channel: String, nick: String },
    /// `nick` lost speaking rights in `channel`
    Devoice { channel: String, nick: String },
    /// `channel` moderation was switched
    Moderated { channel: String, moderated: bool },
}

/// Gateway backed by concurrent maps.
///
/// Presence is tracked by nick, the same way a chat network reports channel
/// membership.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    /// channel -> nicks present
    members: DashMap<String, HashSet<String>>,
    /// channel -> nicks holding voice
    voiced: DashMap<String, HashSet<String>>,
    /// channels currently moderated
    moderated: DashSet<String>,
    /// channels on which every side effect fails
    unavailable: DashSet<String>,
    /// ordered log of issued side effects
    events: Mutex<Vec<GatewayEvent>>,
}

impl MemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `nick` as present in `channel`.
    pub fn enter(&self, channel: &str, nick: &str) {
        self.members
            .entry(channel.to_string())
            .or_default()
            .insert(nick.to_string());
    }

    /// Records `nick` as gone from `channel`. Voice is lost with it.
    ///
    /// # Returns
    ///
    /// `true` if the nick was present.
    pub fn part(&self, channel: &str, nick: &str) -> bool {
        if let Some(mut voiced) = self.voiced.get_mut(channel) {
            voiced.remove(nick);
        }
        self.members
            .get_mut(channel)
            .map(|mut members| members.remove(nick))
            .unwrap_or(false)
    }

    /// Returns true if `nick` is present in `channel`.
    pub fn is_present(&self, channel: &str, nick: &str) -> bool {
        self.members
            .get(channel)
            .is_some_and(|members| members.contains(nick))
    }

    /// Returns true if `nick` currently holds voice in `channel`.
    pub fn is_voiced(&self, channel: &str, nick: &str) -> bool {
        self.voiced
            .get(channel)
            .is_some_and(|voiced| voiced.contains(nick))
    }

    /// Returns true if `channel` is moderated.
    pub fn is_moderated(&self, channel: &str) -> bool {
        self.moderated.contains(channel)
    }

    /// Makes every side effect on `channel` fail, simulating a transport
    /// that lost its privileges there.
    pub fn mark_unavailable(&self, channel: &str) {
        self.unavailable.insert(channel.to_string());
    }

    /// Returns a copy of the side effects issued so far.
    pub async fn events(&self) -> Vec<GatewayEvent> {
        self.events.lock().await.clone()
    }

    fn check_available(&self, channel: &str) -> Result<(), GatewayError> {
        if self.unavailable.contains(channel) {
            return Err(GatewayError::ChannelUnavailable(channel.to_string()));
        }
        Ok(())
    }

    async fn record(&self, event: GatewayEvent) {
        debug!("🎛️ Gateway side effect: {:?}", event);
        self.events.lock().await.push(event);
    }
}

#[async_trait]
impl ChannelGateway for MemoryGateway {
    async fn has_user(&self, channel: &str, user: &Speaker) -> Result<bool, GatewayError> {
        Ok(self.is_present(channel, &user.nick))
    }

    async fn voice(&self, channel: &str, user: &Speaker) -> Result<(), GatewayError> {
        self.check_available(channel)?;
        self.voiced
            .entry(channel.to_string())
            .or_default()
            .insert(user.nick.clone());
        self.record(GatewayEvent::Voice {
            channel: channel.to_string(),
            nick: user.nick.clone(),
        })
        .await;
        Ok(())
    }

    async fn devoice(&self, channel: &str, user: &Speaker) -> Result<(), GatewayError> {
        self.check_available(channel)?;
        if let Some(mut voiced) = self.voiced.get_mut(channel) {
            voiced.remove(&user.nick);
        }
        self.record(GatewayEvent::Devoice {
            channel: channel.to_string(),
            nick: user.nick.clone(),
        })
        .await;
        Ok(())
    }

    async fn set_moderated(&self, channel: &str, moderated: bool) -> Result<(), GatewayError> {
        self.check_available(channel)?;
        if moderated {
            self.moderated.insert(channel.to_string());
        } else {
            self.moderated.remove(channel);
        }
        self.record(GatewayEvent::Moderated {
            channel: channel.to_string(),
            moderated,
        })
        .await;
        Ok(())
    }
}
