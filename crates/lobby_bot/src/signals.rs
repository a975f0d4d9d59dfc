//! Signal handling for graceful shutdown.
//!
//! This module provides the shutdown flag the console transport polls, and
//! cross-platform waiting for termination signals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

/// Shutdown flag shared by the console transport and the supervisor.
///
/// Clones observe the same flag. The console checks it before reading each
/// line, so once it is set no further commands reach the lobby.
#[derive(Debug, Clone)]
pub struct ShutdownState {
    stopping: Arc<AtomicBool>,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self {
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_shutdown_initiated(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    /// Stops the console from reading new lines.
    ///
    /// Returns `false` when shutdown was already under way.
    pub fn initiate_shutdown(&self) -> bool {
        let first = !self.stopping.swap(true, Ordering::AcqRel);
        if first {
            info!("🛑 Shutdown initiated - no new commands will be processed");
        }
        first
    }
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for a termination signal and flags `shutdown_state`.
///
/// # Platform Support
///
/// * **Unix platforms**: Handles SIGINT and SIGTERM signals
/// * **Windows**: Handles Ctrl+C signal
pub async fn setup_signal_handlers(
    shutdown_state: &ShutdownState,
) -> Result<(), Box<dyn std::error::Error>> {
    wait_for_signal().await?;
    info!("📡 Received shutdown signal - initiating graceful shutdown");
    shutdown_state.initiate_shutdown();
    Ok(())
}

/// Waits for a termination signal without logging or flagging anything.
pub async fn wait_for_signal() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(windows)]
    signal::ctrl_c().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_flag_is_shared_and_set_once() {
        let state = ShutdownState::new();
        let clone = state.clone();
        assert!(!clone.is_shutdown_initiated());

        assert!(state.initiate_shutdown());
        assert!(clone.is_shutdown_initiated());

        // Console end and a signal may both try to stop the bot
        assert!(!clone.initiate_shutdown());
        assert!(state.is_shutdown_initiated());
    }
}
