//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cuelink::Actions;
use tokio::net::TcpListener;

/// Records side effects instead of performing them.
#[derive(Default)]
pub struct RecordingActions {
    opened: Mutex<Vec<String>>,
    played: Mutex<Vec<String>>,
}

impl RecordingActions {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }
}

impl Actions for RecordingActions {
    fn open_url(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }

    fn play(&self, url: &str) {
        self.played.lock().unwrap().push(url.to_string());
    }
}

/// Discards every side effect.
pub struct NullActions;

impl Actions for NullActions {
    fn open_url(&self, _url: &str) {}
    fn play(&self, _url: &str) {}
}

/// Bind a controller-side listener on an ephemeral port.
pub async fn bind_controller() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let authority = format!(
        "127.0.0.1:{}",
        listener.local_addr().expect("no local addr").port()
    );
    (listener, authority)
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_until<F: FnMut() -> bool>(mut condition: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Timestamps of accepted connections, shared with server tasks.
pub type AcceptLog = Arc<Mutex<Vec<std::time::Instant>>>;

pub fn accept_log() -> AcceptLog {
    Arc::new(Mutex::new(Vec::new()))
}
