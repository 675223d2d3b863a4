//! Error types for cuelink
//!
//! Defines module-specific error types using thiserror for clear error propagation.
//!
//! Only two of these ever cross a component boundary in practice: `Config`
//! (fatal at startup) and the playback family (fatal inside a playback
//! session). Connection and dispatch failures are handled where they occur
//! and surfaced through tracing only.

use thiserror::Error;

/// Main error type for cuelink
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed endpoint or other configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// WebSocket dial errors (name resolution, refusal, handshake)
    #[error("Connection error: {0}")]
    Connect(String),

    /// HTTP fetch errors (network failure, non-success status)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Audio decoding errors
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio output device errors
    #[error("Audio output error: {0}")]
    AudioOutput(String),
}

/// Convenience Result type using cuelink Error
pub type Result<T> = std::result::Result<T, Error>;
