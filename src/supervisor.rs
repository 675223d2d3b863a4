//! Connection supervision
//!
//! Owns the connection lifecycle: dial the controller, run a sequential
//! read loop over the live WebSocket, and redial forever on failure. Each
//! decoded frame is handed to the dispatcher on a fire-and-forget task; the
//! read loop never waits for a previously dispatched handler.
//!
//! Failure handling is asymmetric on purpose: a failed dial is throttled by
//! a fixed backoff (no exponential growth, no cap, no jitter), while a read
//! error on an established connection drops it and redials immediately.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::config::ServerEndpoint;
use crate::dispatch::{Actions, Dispatcher};
use crate::error::{Error, Result};
use crate::event::decode_frame;

/// Fixed delay between consecutive dial attempts after a dial failure.
pub const DIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Supervises the persistent link to the remote controller.
pub struct ConnectionSupervisor {
    endpoint: ServerEndpoint,
    dispatcher: Arc<Dispatcher>,
    backoff: Duration,
}

impl ConnectionSupervisor {
    pub fn new(endpoint: ServerEndpoint, actions: Arc<dyn Actions>) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(endpoint.clone(), actions));
        Self {
            endpoint,
            dispatcher,
            backoff: DIAL_BACKOFF,
        }
    }

    /// Override the dial-failure backoff. Used by tests to tighten timing.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Run the supervision loop. Never returns; the process is expected to
    /// be terminated externally.
    ///
    /// Retries are unbounded: dial failures wait out the fixed backoff,
    /// read failures redial at once.
    pub async fn run(&self) {
        loop {
            match self.connect_and_read().await {
                Ok(()) => {
                    // Read loop ended on a read error or peer close; the
                    // connection is already gone, redial immediately.
                }
                Err(e) => {
                    warn!("Failed to connect to controller: {}", e);
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }
    }

    /// Dial once and, on success, read frames until the connection fails.
    ///
    /// Returns `Err` only for dial failures. A read error ends the loop and
    /// returns `Ok(())` — by then the failure has been logged and the only
    /// remaining decision (redial) belongs to [`run`](Self::run).
    pub async fn connect_and_read(&self) -> Result<()> {
        let url = self.endpoint.ws_url();
        let (mut ws, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::Connect(format!("{}: {}", url, e)))?;

        info!("Connected to controller at {}", url);

        while let Some(frame) = ws.next().await {
            let message = match frame {
                Ok(message) => message,
                Err(e) => {
                    warn!("Read error on controller link: {}", e);
                    break;
                }
            };

            match message {
                Message::Text(payload) => {
                    debug!("Received frame: {}", payload.as_str());
                    let event = decode_frame(payload.as_str());
                    let dispatcher = Arc::clone(&self.dispatcher);
                    // Fire-and-forget: the read loop continues immediately.
                    tokio::spawn(async move {
                        dispatcher.dispatch(event);
                    });
                }
                Message::Close(_) => {
                    info!("Controller closed the connection");
                    break;
                }
                // Binary frames have no mapping; ping/pong are handled by
                // the protocol layer.
                _ => {}
            }
        }

        Ok(())
    }
}
