//! Message type definitions for chat commands.
//!
//! This module defines what the engine receives from a chat transport: the
//! speaker, the command keyword, its argument, and the originating channel
//! (or none for a private message).

use crate::identity::Speaker;
use std::fmt;

/// The lobby command keywords. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Join,
    Leave,
    Start,
    Who,
    Status,
}

impl Command {
    /// Looks up a command by its keyword (without prefix).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "join" => Some(Self::Join),
            "leave" => Some(Self::Leave),
            "start" => Some(Self::Start),
            "who" => Some(Self::Who),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Start => "start",
            Self::Who => "who",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command delivered by the transport.
///
/// # Fields
///
/// * `speaker` - Who said it
/// * `command` - Which lobby command
/// * `argument` - Remaining text after the keyword, trimmed (None if empty)
/// * `channel` - Channel it was said in, None for private messages
///
/// # Examples
///
/// ```rust
/// use lobby_server::{Command, IncomingCommand, Speaker};
///
/// let cmd = IncomingCommand::parse("!", Speaker::new("test1"), None, "!join #test").unwrap();
/// assert_eq!(cmd.command, Command::Join);
/// assert_eq!(cmd.argument.as_deref(), Some("#test"));
/// assert!(cmd.channel.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCommand {
    pub speaker: Speaker,
    pub command: Command,
    pub argument: Option<String>,
    pub channel: Option<String>,
}

impl IncomingCommand {
    /// Builds a command directly, bypassing text parsing.
    pub fn new(speaker: Speaker, command: Command, channel: Option<String>) -> Self {
        Self {
            speaker,
            command,
            argument: None,
            channel,
        }
    }

    /// Sets the argument text.
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        let argument = argument.into();
        let trimmed = argument.trim();
        self.argument = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Parses a chat line into a command.
    ///
    /// # Returns
    ///
    /// `None` if the line does not start with `prefix` or names an unknown
    /// command; such lines are ordinary chat and must be ignored.
    pub fn parse(prefix: &str, speaker: Speaker, channel: Option<String>, text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix(prefix)?;
        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument),
            None => (rest, ""),
        };
        let command = Command::from_name(name)?;
        Some(Self::new(speaker, command, channel).with_argument(argument))
    }

    /// First whitespace-separated token of the argument.
    pub fn first_argument(&self) -> Option<&str> {
        self.argument
            .as_deref()
            .and_then(|a| a.split_whitespace().next())
    }
}
