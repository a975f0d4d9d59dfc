//! Player identity resolution.
//!
//! Chat transports are free to build a fresh user object for every message
//! they deliver, so membership can never rely on object identity. Everything
//! in the lobby keys on the [`PlayerKey`] produced by [`resolve`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The author of a command, as reported by the transport.
///
/// # Fields
///
/// * `nick` - Display name currently used on the network
/// * `account` - Authenticated account name, when the network reports one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Speaker {
    /// Current display name
    pub nick: String,

    /// Authenticated account name (None for unauthenticated users)
    pub account: Option<String>,
}

impl Speaker {
    /// Creates an unauthenticated speaker.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            account: None,
        }
    }

    /// Creates a speaker the transport has authenticated as `account`.
    pub fn authenticated(nick: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            account: Some(account.into()),
        }
    }

    /// Returns true if the transport reported an authenticated account.
    pub fn is_authenticated(&self) -> bool {
        self.account.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// Canonical identity used to deduplicate lobby membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey(String);

impl PlayerKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the stable player key for a speaker.
///
/// The authenticated account wins when present; otherwise the display nick
/// is used. Two speakers describing the same human always produce equal keys,
/// no matter how many distinct `Speaker` values the transport created.
pub fn resolve(speaker: &Speaker) -> PlayerKey {
    match speaker.account.as_deref().filter(|a| !a.is_empty()) {
        Some(account) => PlayerKey(account.to_string()),
        None => PlayerKey(speaker.nick.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_account() {
        let speaker = Speaker::authenticated("guest42", "alice");
        assert_eq!(resolve(&speaker).as_str(), "alice");
        assert!(speaker.is_authenticated());
    }

    #[test]
    fn test_resolve_falls_back_to_nick() {
        let speaker = Speaker::new("bob");
        assert_eq!(resolve(&speaker).as_str(), "bob");
        assert!(!speaker.is_authenticated());
    }

    #[test]
    fn test_empty_account_is_ignored() {
        let speaker = Speaker {
            nick: "carol".to_string(),
            account: Some(String::new()),
        };
        assert_eq!(resolve(&speaker).as_str(), "carol");
    }

    #[test]
    fn test_fresh_speaker_values_resolve_equal() {
        // Transports hand us a new object per message
        let first = Speaker::authenticated("test1", "test1");
        let second = Speaker::authenticated("test1", "test1");
        assert_eq!(resolve(&first), resolve(&second));

        // A nick change does not change an authenticated identity
        let renamed = Speaker::authenticated("test1_away", "test1");
        assert_eq!(resolve(&first), resolve(&renamed));
    }
}
