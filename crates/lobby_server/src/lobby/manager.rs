//! Lobby manager for tracking and mutating per-channel sessions.
//!
//! This module provides the central state machine of the engine. It owns one
//! [`Session`] per channel, applies the join/leave/start/who/status protocol
//! against it, and issues the matching channel gateway side effects.

use super::outcome::{Outcome, Rejection};
use super::session::{Phase, Player, Session, SessionSnapshot};
use super::stats::LobbyStats;
use crate::config::LobbyConfig;
use crate::error::LobbyError;
use crate::game::{GameDescriptor, StartContext};
use crate::gateway::ChannelGateway;
use crate::identity::{self, PlayerKey, Speaker};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

type SessionHandle = Arc<Mutex<Session>>;

/// Central owner of all lobby sessions.
///
/// # Architecture
///
/// * `DashMap` keyed by channel holds one `Arc<Mutex<Session>>` per channel
/// * The session mutex is held for the whole validate -> side effect -> mutate
///   sequence, so commands for one channel never interleave
/// * Different channels never contend on the same lock
/// * Gateway side effects are issued before the in-memory mutation, so a
///   failing gateway leaves the session untouched
#[derive(Debug)]
pub struct LobbyManager {
    config: LobbyConfig,
    descriptor: GameDescriptor,
    gateway: Arc<dyn ChannelGateway>,
    sessions: DashMap<String, SessionHandle>,
}

impl LobbyManager {
    /// Creates a lobby for one game over the configured channels.
    pub fn new(
        config: LobbyConfig,
        descriptor: GameDescriptor,
        gateway: Arc<dyn ChannelGateway>,
    ) -> Self {
        info!(
            "🎲 Lobby for {} ({}-{} players) on {} channel(s)",
            descriptor.name(),
            descriptor.min_players(),
            descriptor.max_players(),
            config.channels.len()
        );
        Self {
            config,
            descriptor,
            gateway,
            sessions: DashMap::new(),
        }
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }

    pub fn descriptor(&self) -> &GameDescriptor {
        &self.descriptor
    }

    fn session(&self, channel: &str) -> Option<SessionHandle> {
        self.sessions.get(channel).map(|entry| Arc::clone(entry.value()))
    }

    /// Locks the channel's session for a join, creating it if needed.
    ///
    /// # Returns
    ///
    /// The handle, its guard, and whether this call created the session. A
    /// handle that was dropped from the table while we waited for its lock
    /// is discarded and the lookup retried.
    async fn lock_for_join(&self, channel: &str) -> (SessionHandle, OwnedMutexGuard<Session>, bool) {
        loop {
            let mut created = false;
            let handle = Arc::clone(
                self.sessions
                    .entry(channel.to_string())
                    .or_insert_with(|| {
                        created = true;
                        Arc::new(Mutex::new(Session::new(channel)))
                    })
                    .value(),
            );
            let guard = Arc::clone(&handle).lock_owned().await;

            let current = self
                .sessions
                .get(channel)
                .is_some_and(|entry| Arc::ptr_eq(entry.value(), &handle));
            if current {
                return (handle, guard, created);
            }
        }
    }

    fn reject(&self, speaker: &Speaker, rejection: Rejection) -> Outcome {
        debug!("🚫 Rejected command from {}: {:?}", speaker.nick, rejection);
        Outcome::Rejected(rejection)
    }

    /// Adds the speaker to a channel's roster.
    ///
    /// # Arguments
    ///
    /// * `speaker` - Who sent the command
    /// * `origin` - Channel the command was said in (None for private messages)
    /// * `channel_arg` - Channel named in the command, used only without `origin`
    ///
    /// # Validation Order
    ///
    /// 1. A target channel must be resolvable
    /// 2. The target must be in the channel registry
    /// 3. The speaker must be present in the target channel
    /// 4. Started games: members are ignored, everyone else is refused
    /// 5. Members cannot join twice
    /// 6. The roster must have room
    pub async fn join(
        &self,
        speaker: &Speaker,
        origin: Option<&str>,
        channel_arg: Option<&str>,
    ) -> Result<Outcome, LobbyError> {
        let target = origin.or_else(|| channel_arg.map(str::trim).filter(|c| !c.is_empty()));
        let Some(channel) = target else {
            return Ok(self.reject(speaker, Rejection::MissingChannel));
        };

        if !self.config.is_registered(channel) {
            return Ok(self.reject(
                speaker,
                Rejection::InvalidChannel {
                    channel: channel.to_string(),
                },
            ));
        }

        let (handle, mut session, created) = self.lock_for_join(channel).await;
        let result = self.join_locked(&mut session, channel, speaker).await;

        // Sessions only come into existence through a successful join
        if created && session.is_absent() {
            self.sessions
                .remove_if(channel, |_, existing| Arc::ptr_eq(existing, &handle));
        }
        result
    }

    async fn join_locked(
        &self,
        session: &mut Session,
        channel: &str,
        speaker: &Speaker,
    ) -> Result<Outcome, LobbyError> {
        if !self.gateway.has_user(channel, speaker).await? {
            return Ok(self.reject(
                speaker,
                Rejection::NotInChannel {
                    channel: channel.to_string(),
                },
            ));
        }

        let key = identity::resolve(speaker);
        if session.phase() == Phase::Started {
            if session.contains(&key) {
                return Ok(Outcome::Silent);
            }
            return Ok(self.reject(speaker, Rejection::AlreadyStarted));
        }

        if session.contains(&key) {
            return Ok(self.reject(
                speaker,
                Rejection::AlreadyJoined {
                    channel: channel.to_string(),
                },
            ));
        }

        let max_players = self.descriptor.max_players();
        if session.len() >= max_players {
            return Ok(self.reject(speaker, Rejection::GameFull));
        }

        self.gateway.voice(channel, speaker).await?;
        let player = Player::from_speaker(speaker);
        let count = session.add(player.clone(), max_players)?;

        info!(
            "➕ {} joined the {} game ({}/{})",
            player.name(),
            channel,
            count,
            max_players
        );
        Ok(Outcome::Joined {
            channel: channel.to_string(),
            player,
            count,
        })
    }

    /// Removes the speaker from a channel's roster.
    ///
    /// Leaving a game you are not in is a silent no-op; leaving a started
    /// game is refused.
    pub async fn leave(&self, channel: &str, speaker: &Speaker) -> Result<Outcome, LobbyError> {
        let key = identity::resolve(speaker);
        let Some(handle) = self.session(channel) else {
            return Ok(Outcome::Silent);
        };
        let mut session = handle.lock().await;

        if !session.contains(&key) {
            return Ok(Outcome::Silent);
        }
        if session.phase() == Phase::Started {
            return Ok(self.reject(speaker, Rejection::CannotLeaveInProgress));
        }

        self.gateway.devoice(channel, speaker).await?;
        self.remove_member(&mut session, &key)
    }

    /// Handles a speaker that parted, quit, or was kicked from a channel.
    ///
    /// A forming roster drops the player just like `leave` does, minus the
    /// devoice (the user is no longer there to hold voice). Started rosters
    /// and non-members are left alone.
    pub async fn departed(&self, channel: &str, speaker: &Speaker) -> Result<Outcome, LobbyError> {
        let key = identity::resolve(speaker);
        let Some(handle) = self.session(channel) else {
            return Ok(Outcome::Silent);
        };
        let mut session = handle.lock().await;

        if session.phase() == Phase::Started || !session.contains(&key) {
            return Ok(Outcome::Silent);
        }
        self.remove_member(&mut session, &key)
    }

    fn remove_member(&self, session: &mut Session, key: &PlayerKey) -> Result<Outcome, LobbyError> {
        let player = session.remove(key)?.ok_or_else(|| {
            LobbyError::InvariantViolation(format!(
                "{key} vanished from {} while locked",
                session.channel()
            ))
        })?;

        info!(
            "➖ {} left the {} game ({}/{})",
            player.name(),
            session.channel(),
            session.len(),
            self.descriptor.max_players()
        );
        Ok(Outcome::Left {
            channel: session.channel().to_string(),
            player,
            count: session.len(),
        })
    }

    /// Locks a channel's roster and hands it to the game.
    ///
    /// # Process
    ///
    /// 1. Refuse non-members
    /// 2. Refuse rosters below the game's minimum
    /// 3. Moderate the channel, mark the session started, run the start hook
    pub async fn start(&self, channel: &str, speaker: &Speaker) -> Result<Outcome, LobbyError> {
        let key = identity::resolve(speaker);
        let Some(handle) = self.session(channel) else {
            return Ok(self.reject(speaker, Rejection::NotInGame));
        };
        let mut session = handle.lock().await;

        if !session.contains(&key) {
            return Ok(self.reject(speaker, Rejection::NotInGame));
        }
        if session.phase() == Phase::Started {
            return Ok(Outcome::Silent);
        }
        if session.len() < self.descriptor.min_players() {
            return Ok(self.reject(speaker, Rejection::NotEnoughPlayers));
        }

        self.gateway.set_moderated(channel, true).await?;
        session.start();
        let announcements = self.descriptor.on_start(&StartContext {
            channel,
            players: session.players(),
        });

        info!(
            "🚀 {} started in {} with {} players",
            self.descriptor.name(),
            channel,
            session.len()
        );
        Ok(Outcome::Started {
            channel: channel.to_string(),
            announcements,
        })
    }

    /// Roster listing for a channel. Read only.
    pub async fn who(&self, channel: &str) -> Outcome {
        Outcome::Who(self.snapshot(channel).await)
    }

    /// Session summary for a channel. Read only.
    pub async fn status(&self, channel: &str) -> Outcome {
        Outcome::Status(self.snapshot(channel).await)
    }

    /// Copies a channel's session state, or an empty snapshot if the channel
    /// never had one.
    pub async fn snapshot(&self, channel: &str) -> SessionSnapshot {
        match self.session(channel) {
            Some(handle) => handle.lock().await.snapshot(),
            None => SessionSnapshot::empty(channel),
        }
    }

    /// Returns true if `channel` has a session, even an emptied one.
    pub fn has_session(&self, channel: &str) -> bool {
        self.sessions.contains_key(channel)
    }

    /// Finds the channel whose roster contains `key`.
    ///
    /// Channels are searched in name order, so a player on several rosters
    /// always resolves to the same one.
    pub async fn session_of(&self, key: &PlayerKey) -> Option<String> {
        self.find_session(key, |_| true).await
    }

    /// Like [`session_of`](Self::session_of), but only considers rosters
    /// that are still forming.
    pub async fn forming_session_of(&self, key: &PlayerKey) -> Option<String> {
        self.find_session(key, |phase| phase == Phase::Forming).await
    }

    async fn find_session<F>(&self, key: &PlayerKey, accept: F) -> Option<String>
    where
        F: Fn(Phase) -> bool,
    {
        let mut handles: Vec<(String, SessionHandle)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        handles.sort_by(|a, b| a.0.cmp(&b.0));

        for (channel, handle) in handles {
            let session = handle.lock().await;
            if accept(session.phase()) && session.contains(key) {
                return Some(channel);
            }
        }
        None
    }

    /// Collects a statistics snapshot across all sessions.
    pub async fn stats(&self) -> LobbyStats {
        let handles: Vec<SessionHandle> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut stats = LobbyStats::default();
        for handle in handles {
            let session = handle.lock().await;
            if session.is_absent() {
                continue;
            }
            stats.sessions += 1;
            stats.players += session.len();
            match session.phase() {
                Phase::Forming => stats.forming += 1,
                Phase::Started => stats.started += 1,
            }
        }
        stats
    }
}
