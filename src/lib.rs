//! # cuelink
//!
//! Persistent-connection cue client. Maintains a long-lived WebSocket link
//! to a remote controller, decodes the small command events it receives,
//! and triggers local side effects: playing a remote audio clip or opening
//! a URL in the platform browser.
//!
//! **Architecture:** a connection supervisor owns the link and its
//! sequential read loop; each decoded event is dispatched on a detached
//! task; playback sessions share one process-wide output context.
//!
//! The client runs until the process is terminated externally — there is no
//! graceful shutdown path.

pub mod actions;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod playback;
pub mod supervisor;

pub use config::ServerEndpoint;
pub use dispatch::{Actions, Dispatcher};
pub use error::{Error, Result};
pub use event::{decode_frame, Event};
pub use supervisor::ConnectionSupervisor;
