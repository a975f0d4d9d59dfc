//! Reply formatting.
//!
//! Turns a command [`Outcome`] into the literal lines users see, together
//! with a routing hint. Everything here is pure: same outcome and descriptor
//! in, same replies out.
//!
//! ## Routing
//!
//! | Route | In a channel | By private message |
//! |-------|--------------|-------------------|
//! | `Channel(c)` | sent to `c` | sent to `c` |
//! | `Speaker` | sent to the channel as `"<nick>: <text>"` | sent to the user |
//! | `Origin` | sent to the channel | sent to the user |

use crate::game::GameDescriptor;
use crate::identity::Speaker;
use crate::lobby::{Outcome, Phase, Player, Rejection, SessionSnapshot};

/// Where a reply should go, relative to the command that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyRoute {
    /// Announce in a specific channel
    Channel(String),
    /// Answer the speaker, highlighting them when in a channel
    Speaker,
    /// Answer wherever the command came from, without highlighting
    Origin,
}

/// A rendered line plus its routing hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub route: ReplyRoute,
    pub text: String,
}

/// Final destination of a line on the chat network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeliveryTarget {
    Channel(String),
    User(String),
}

/// A line ready to be sent by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub target: DeliveryTarget,
    pub text: String,
}

impl Reply {
    fn to_channel(channel: &str, text: String) -> Self {
        Self {
            route: ReplyRoute::Channel(channel.to_string()),
            text,
        }
    }

    /// Resolves the routing hint for a command said by `speaker` in `origin`
    /// (None for private messages).
    pub fn deliver(&self, speaker: &Speaker, origin: Option<&str>) -> Delivery {
        match (&self.route, origin) {
            (ReplyRoute::Channel(channel), _) => Delivery {
                target: DeliveryTarget::Channel(channel.clone()),
                text: self.text.clone(),
            },
            (ReplyRoute::Speaker, Some(channel)) => Delivery {
                target: DeliveryTarget::Channel(channel.to_string()),
                text: format!("{}: {}", speaker.nick, self.text),
            },
            (ReplyRoute::Origin, Some(channel)) => Delivery {
                target: DeliveryTarget::Channel(channel.to_string()),
                text: self.text.clone(),
            },
            (ReplyRoute::Speaker | ReplyRoute::Origin, None) => Delivery {
                target: DeliveryTarget::User(speaker.nick.clone()),
                text: self.text.clone(),
            },
        }
    }
}

/// Renders an outcome into zero or more replies.
pub fn render(outcome: &Outcome, game: &GameDescriptor) -> Vec<Reply> {
    match outcome {
        Outcome::Silent => Vec::new(),
        Outcome::Rejected(rejection) => vec![Reply {
            route: ReplyRoute::Speaker,
            text: rejection_text(rejection, game),
        }],
        Outcome::Joined {
            channel,
            player,
            count,
        } => vec![Reply::to_channel(
            channel,
            format!(
                "{} has joined the game ({}/{})",
                player.name(),
                count,
                game.max_players()
            ),
        )],
        Outcome::Left {
            channel,
            player,
            count,
        } => vec![Reply::to_channel(
            channel,
            format!(
                "{} has left the game ({}/{})",
                player.name(),
                count,
                game.max_players()
            ),
        )],
        Outcome::Started {
            channel,
            announcements,
        } => announcements
            .iter()
            .map(|line| Reply::to_channel(channel, line.clone()))
            .collect(),
        Outcome::Who(snapshot) => vec![Reply {
            route: ReplyRoute::Origin,
            text: who_text(snapshot),
        }],
        Outcome::Status(snapshot) => vec![Reply {
            route: ReplyRoute::Origin,
            text: status_text(snapshot, game),
        }],
    }
}

/// The literal refusal line for a rejection.
pub fn rejection_text(rejection: &Rejection, game: &GameDescriptor) -> String {
    match rejection {
        Rejection::MissingChannel => "You must specify the channel.".to_string(),
        Rejection::InvalidChannel { channel } => {
            format!("{channel} is not a valid channel to join")
        }
        Rejection::NotInChannel { channel } => {
            format!("You need to be in {channel} to join the game.")
        }
        Rejection::AlreadyStarted => "Game has already started.".to_string(),
        Rejection::AlreadyJoined { channel } => format!("You are already in the {channel} game"),
        Rejection::GameFull => format!(
            "Game is already at {} players, the maximum supported for {}.",
            game.max_players(),
            game.name()
        ),
        Rejection::CannotLeaveInProgress => "You cannot leave a game in progress.".to_string(),
        Rejection::NotInGame => "You are not in the game.".to_string(),
        Rejection::NotEnoughPlayers => format!(
            "Need at least {} to start a game of {}.",
            game.min_players(),
            game.name()
        ),
    }
}

fn names(players: &[Player]) -> String {
    players
        .iter()
        .map(Player::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Forming rosters are a plain comma list; started rosters are bracketed.
fn who_text(snapshot: &SessionSnapshot) -> String {
    if snapshot.is_absent() {
        return "No one has joined the game yet.".to_string();
    }
    match snapshot.phase {
        Phase::Forming => names(&snapshot.players),
        Phase::Started => format!("[{}]", names(&snapshot.players)),
    }
}

fn status_text(snapshot: &SessionSnapshot, game: &GameDescriptor) -> String {
    if snapshot.is_absent() {
        return format!("No game of {} in progress. Join and start one!", game.name());
    }
    match snapshot.phase {
        Phase::Forming => format!(
            "A game of {} is forming. {} players have joined: {}",
            game.name(),
            snapshot.players.len(),
            names(&snapshot.players)
        ),
        Phase::Started => format!("Game started with players {}", names(&snapshot.players)),
    }
}
