//! # Lobby Server - Chat-Driven Game Lobbies
//!
//! A reusable lobby engine that lets chat users assemble into a bounded
//! roster per channel, lock that roster when the game starts, and query it,
//! all through short text commands.
//!
//! ## Design Philosophy
//!
//! The engine contains **NO game logic** and **NO transport code**:
//!
//! * **Games are data** - a [`GameDescriptor`] carries a name, player bounds
//!   and a start hook; the lobby hands over the roster and steps back
//! * **Transports are a capability** - a [`ChannelGateway`] answers presence
//!   checks and controls speaking rights; the router returns [`Delivery`]
//!   values for the transport to send
//!
//! ## Architecture Overview
//!
//! ### Core Components
//!
//! * **Identity Resolver** ([`identity`]) - Stable player keys from speakers
//! * **Lobby Manager** ([`LobbyManager`]) - Per-channel session state machine
//! * **Reply Formatter** ([`reply`]) - Literal user-facing lines and routing
//! * **Command Router** ([`CommandRouter`]) - Keyword to operation mapping
//!
//! ### Command Flow
//!
//! 1. The transport hands over `(speaker, text, channel-or-none)`
//! 2. The router parses the command and resolves the target channel
//! 3. The lobby manager locks that channel's session, validates, issues
//!    gateway side effects and mutates
//! 4. The reply formatter renders the outcome
//! 5. The transport sends the resulting deliveries
//!
//! ### Commands
//!
//! | Command | Argument | Effect |
//! |---------|----------|--------|
//! | `!join` | channel (private messages only) | Add speaker to the roster |
//! | `!leave` | - | Remove speaker from a forming roster |
//! | `!start` | - | Lock the roster and start the game |
//! | `!who` | - | List the roster |
//! | `!status` | - | Summarize the session |
//!
//! ## Error Handling
//!
//! Refused commands are ordinary [`Outcome`]s with a reply. Only unexpected
//! failures (gateway errors, broken invariants) surface as [`LobbyError`].
//!
//! ## Thread Safety
//!
//! Sessions live in a `DashMap` of `Arc<tokio::sync::Mutex<Session>>`. Each
//! command holds its channel's lock from validation through mutation, so
//! commands for one channel are serialized while different channels proceed
//! independently.

// Re-export core types and functions for easy access
pub use async_trait::async_trait;
pub use config::LobbyConfig;
pub use error::{GatewayError, LobbyError};
pub use game::{GameDescriptor, StartContext, StartHook};
pub use gateway::{ChannelGateway, GatewayEvent, MemoryGateway};
pub use identity::{PlayerKey, Speaker};
pub use lobby::{LobbyManager, LobbyStats, Outcome, Phase, Player, Rejection, SessionSnapshot};
pub use messaging::{Command, CommandRouter, IncomingCommand};
pub use reply::{Delivery, DeliveryTarget, Reply, ReplyRoute};
pub use utils::{create_lobby, create_router};

// Public module declarations
pub mod config;
pub mod error;
pub mod game;
pub mod gateway;
pub mod identity;
pub mod lobby;
pub mod messaging;
pub mod reply;
pub mod utils;
