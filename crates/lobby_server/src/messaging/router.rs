//! Command routing logic for dispatching chat commands to the lobby.
//!
//! This module maps each command keyword to a lobby manager operation,
//! works out which channel a command targets, and turns the resulting
//! outcome into deliveries for the transport.

use crate::error::LobbyError;
use crate::identity::{self, Speaker};
use crate::lobby::{LobbyManager, Outcome, Rejection};
use crate::messaging::types::{Command, IncomingCommand};
use crate::reply::{self, Delivery};
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Thin dispatcher in front of a [`LobbyManager`].
///
/// # Channel Resolution
///
/// Commands said in a channel always target that channel. Outside a channel:
///
/// * `join` needs the channel as its argument
/// * other commands use a registered channel named in the argument, else the
///   channel whose roster contains the speaker
/// * `leave` and `start` prefer a roster that is still forming
#[derive(Debug, Clone)]
pub struct CommandRouter {
    manager: Arc<LobbyManager>,
}

impl CommandRouter {
    pub fn new(manager: Arc<LobbyManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<LobbyManager> {
        &self.manager
    }

    /// Parses a raw chat line and dispatches it.
    ///
    /// Lines that are not lobby commands produce no deliveries.
    pub async fn dispatch_text(
        &self,
        speaker: Speaker,
        channel: Option<String>,
        text: &str,
    ) -> Result<Vec<Delivery>, LobbyError> {
        let prefix = &self.manager.config().command_prefix;
        match IncomingCommand::parse(prefix, speaker, channel, text) {
            Some(command) => self.dispatch(&command).await,
            None => {
                trace!("Ignoring non-command line: {:?}", text);
                Ok(Vec::new())
            }
        }
    }

    /// Applies a command and renders the deliveries it produces.
    ///
    /// # Returns
    ///
    /// The lines to send (possibly none), or a `LobbyError` if a fatal
    /// failure interrupted the command.
    pub async fn dispatch(&self, command: &IncomingCommand) -> Result<Vec<Delivery>, LobbyError> {
        debug!(
            "📨 {} from {} in {}",
            command.command,
            command.speaker.nick,
            command.channel.as_deref().unwrap_or("<private>")
        );

        let outcome = self.apply(command).await.map_err(|e| {
            error!("❌ {} from {} failed: {}", command.command, command.speaker.nick, e);
            e
        })?;

        Ok(self.deliveries(&outcome, &command.speaker, command.channel.as_deref()))
    }

    /// Reports that `speaker` is no longer present in `channel`.
    pub async fn departed(&self, channel: &str, speaker: &Speaker) -> Result<Vec<Delivery>, LobbyError> {
        let outcome = self.manager.departed(channel, speaker).await?;
        Ok(self.deliveries(&outcome, speaker, Some(channel)))
    }

    fn deliveries(&self, outcome: &Outcome, speaker: &Speaker, origin: Option<&str>) -> Vec<Delivery> {
        reply::render(outcome, self.manager.descriptor())
            .iter()
            .map(|r| r.deliver(speaker, origin))
            .collect()
    }

    async fn apply(&self, command: &IncomingCommand) -> Result<Outcome, LobbyError> {
        let speaker = &command.speaker;

        match command.command {
            Command::Join => {
                self.manager
                    .join(speaker, command.channel.as_deref(), command.first_argument())
                    .await
            }
            Command::Leave => match self.target_channel(command, true).await {
                Some(channel) => self.manager.leave(&channel, speaker).await,
                None => Ok(Outcome::Silent),
            },
            Command::Start => match self.target_channel(command, true).await {
                Some(channel) => self.manager.start(&channel, speaker).await,
                None => Ok(Outcome::Rejected(Rejection::NotInGame)),
            },
            Command::Who => match self.target_channel(command, false).await {
                Some(channel) => Ok(self.manager.who(&channel).await),
                None => Ok(Outcome::Rejected(Rejection::MissingChannel)),
            },
            Command::Status => match self.target_channel(command, false).await {
                Some(channel) => Ok(self.manager.status(&channel).await),
                None => Ok(Outcome::Rejected(Rejection::MissingChannel)),
            },
        }
    }

    /// Works out which channel a command targets.
    ///
    /// With `prefer_forming`, a speaker on several rosters resolves to one
    /// that can still change before falling back to any roster.
    async fn target_channel(&self, command: &IncomingCommand, prefer_forming: bool) -> Option<String> {
        if let Some(channel) = &command.channel {
            return Some(channel.clone());
        }
        if let Some(channel) = command
            .first_argument()
            .filter(|c| self.manager.config().is_registered(c))
        {
            return Some(channel.to_string());
        }

        let key = identity::resolve(&command.speaker);
        if prefer_forming {
            if let Some(channel) = self.manager.forming_session_of(&key).await {
                return Some(channel);
            }
        }
        self.manager.session_of(&key).await
    }
}
