//! Production action handlers
//!
//! Browser launch goes through the platform "open" mechanism; playback
//! requests are handed to the playback module on a detached task so the
//! dispatching path never waits for audio.

use tracing::{info, warn};

use crate::dispatch::Actions;
use crate::playback;

/// [`Actions`] implementation backed by the host system.
pub struct SystemActions;

impl Actions for SystemActions {
    /// Open `url` with the OS-appropriate handler.
    ///
    /// Failure (no handler registered, spawn error) is logged and otherwise
    /// ignored — never escalated, never retried.
    fn open_url(&self, url: &str) {
        info!("Opening URL in browser: {}", url);
        if let Err(e) = open::that(url) {
            warn!("Failed to open browser for {}: {}", url, e);
        }
    }

    /// Start a playback session for `url` without blocking the caller.
    fn play(&self, url: &str) {
        let url = url.to_string();
        tokio::spawn(async move {
            playback::request_playback(&url).await;
        });
    }
}
