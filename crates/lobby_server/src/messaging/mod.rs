//! Command parsing and routing for chat transports.
//!
//! This module provides the infrastructure for turning chat lines into lobby
//! commands and lobby outcomes back into chat lines.

pub mod router;
pub mod types;

pub use router::CommandRouter;
pub use types::{Command, IncomingCommand};
