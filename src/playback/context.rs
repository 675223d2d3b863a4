//! Shared playback context
//!
//! Process-wide singleton holding the resolved output device and the fixed
//! stream configuration every session plays through. Created lazily on the
//! first playback request and never torn down.
//!
//! Creation is guarded by a one-time-initialization cell: two concurrent
//! first requests may both resolve a device, but exactly one context is
//! retained and both callers observe it. cpal streams are not `Send`, so
//! the context stores the resolved device *name* and each session reopens
//! the device on its own playback thread.

use std::sync::OnceLock;

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{BufferSize, Device, SampleRate, StreamConfig};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Fixed output sample rate. Sources at other rates are played as-is, the
/// same passthrough the original audio layer had.
pub const SAMPLE_RATE: u32 = 44_100;

/// Fixed output channel count (stereo).
pub const CHANNELS: u16 = 2;

static CONTEXT: OnceLock<PlaybackContext> = OnceLock::new();

/// The shared audio-output resource.
#[derive(Debug, Clone)]
pub struct PlaybackContext {
    device_name: Option<String>,
    config: StreamConfig,
}

impl PlaybackContext {
    /// Get the process-wide context, constructing it on first use.
    ///
    /// Construction failure (no output device available) is returned to the
    /// caller, which treats it as fatal. A context is never cached on
    /// failure, so a later call retries construction.
    pub fn shared() -> Result<&'static PlaybackContext> {
        if let Some(context) = CONTEXT.get() {
            return Ok(context);
        }
        let context = Self::init()?;
        Ok(CONTEXT.get_or_init(|| context))
    }

    fn init() -> Result<PlaybackContext> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioOutput("no default output device available".to_string()))?;

        let device_name = device.name().ok();
        let config = StreamConfig {
            channels: CHANNELS,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: BufferSize::Default,
        };

        info!(
            "Playback context initialized: device={}, {} Hz, {} channels",
            device_name.as_deref().unwrap_or("<default>"),
            SAMPLE_RATE,
            CHANNELS
        );

        Ok(PlaybackContext { device_name, config })
    }

    /// Stream configuration shared by all sessions.
    pub fn stream_config(&self) -> &StreamConfig {
        &self.config
    }

    /// Reopen the context's output device for one session.
    ///
    /// Falls back to the default device if the originally resolved device
    /// has disappeared since the context was created.
    pub fn open_device(&self) -> Result<Device> {
        let host = cpal::default_host();

        if let Some(name) = self.device_name.as_deref() {
            if let Ok(mut devices) = host.output_devices() {
                if let Some(device) = devices.find(|d| d.name().ok().as_deref() == Some(name)) {
                    return Ok(device);
                }
            }
            warn!("Output device '{}' not found, falling back to default device", name);
        }

        host.default_output_device()
            .ok_or_else(|| Error::AudioOutput("no output device available".to_string()))
    }
}
