//! # Lobby Bot - Main Entry Point
//!
//! Runs the lobby engine behind a line-oriented console transport.
//!
//! ```bash
//! # Run with default configuration
//! lobby_bot
//!
//! # Operate on specific channels with a custom prefix
//! lobby_bot --channel '#games' --channel '#test' --prefix '@'
//!
//! # JSON logging
//! lobby_bot --json-logs
//! ```

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib_lobby_bot::init().await
}
