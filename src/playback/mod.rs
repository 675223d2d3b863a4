//! Audio playback
//!
//! `request_playback` fetches a remote resource over HTTP, decodes it, and
//! plays it through the shared [`PlaybackContext`]. The caller returns as
//! soon as the playback thread is spawned; completion is polled on that
//! thread and the stream is released when the clip ends.
//!
//! Fetch, decode, and context failures are fatal to the whole process.
//! That severity is deliberately harsher than the connection layer's
//! log-and-retry handling: a failed cue fetch means the controller and
//! client disagree about available assets, which is not a state this
//! client recovers from on its own.
//!
//! There is no queueing or mixing policy: concurrent requests create
//! independent sessions against the one shared context, and the audio
//! layer's behavior for concurrent streams is passed through.

pub mod context;
pub mod decoder;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, StreamTrait};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
pub use context::PlaybackContext;
pub use decoder::StreamDecoder;

/// Poll interval for playback completion.
const COMPLETION_POLL: Duration = Duration::from_millis(1);

/// Fetch, decode, and play one remote audio resource.
///
/// Never returns an error: recoverable outcomes don't exist on this path,
/// so any failure logs and aborts the process.
pub async fn request_playback(url: &str) {
    if let Err(e) = start_session(url).await {
        error!("Fatal playback failure for {}: {}", url, e);
        std::process::exit(1);
    }
}

async fn start_session(url: &str) -> Result<()> {
    info!("Downloading audio from: {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?
        .error_for_status()
        .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

    // Decoding is CPU-bound; keep it off the async workers.
    let (samples, source_rate) =
        tokio::task::spawn_blocking(move || StreamDecoder::decode_bytes(bytes.to_vec()))
            .await
            .map_err(|e| Error::Decode(format!("decode task failed: {}", e)))??;

    let context = PlaybackContext::shared()?;
    let session = PlaybackSession::new(context, samples, source_rate);

    // cpal streams are not Send, so the session lives on its own thread.
    // The thread polls for completion and releases the stream; this call
    // returns as soon as it is spawned.
    std::thread::Builder::new()
        .name("cuelink-playback".to_string())
        .spawn(move || {
            if let Err(e) = session.play_to_completion() {
                error!("Fatal playback failure: {}", e);
                std::process::exit(1);
            }
        })
        .map_err(|e| Error::AudioOutput(format!("failed to spawn playback thread: {}", e)))?;

    Ok(())
}

/// One in-flight decode-and-play operation bound to the shared context.
pub struct PlaybackSession {
    context: &'static PlaybackContext,
    samples: Arc<Vec<f32>>,
    source_rate: u32,
}

impl PlaybackSession {
    pub fn new(context: &'static PlaybackContext, samples: Vec<f32>, source_rate: u32) -> Self {
        Self {
            context,
            samples: Arc::new(samples),
            source_rate,
        }
    }

    /// Play the decoded samples and block until the clip finishes.
    ///
    /// The output stream runs at the context's fixed rate; sources at other
    /// rates are played as-is rather than resampled.
    pub fn play_to_completion(self) -> Result<()> {
        if self.samples.is_empty() {
            warn!("Nothing to play, decoded stream was empty");
            return Ok(());
        }
        if self.source_rate != context::SAMPLE_RATE {
            debug!(
                "Source rate {} Hz differs from output rate {} Hz, playing as-is",
                self.source_rate,
                context::SAMPLE_RATE
            );
        }

        let device = self.context.open_device()?;
        let config = self.context.stream_config().clone();

        let total = self.samples.len();
        let cursor = Arc::new(AtomicUsize::new(0));

        let samples = Arc::clone(&self.samples);
        let callback_cursor = Arc::clone(&cursor);

        let stream = device
            .build_output_stream(
                &config,
                move |out: &mut [f32], _| {
                    let mut pos = callback_cursor.load(Ordering::Relaxed);
                    for slot in out.iter_mut() {
                        *slot = samples.get(pos).copied().unwrap_or(0.0);
                        if pos < total {
                            pos += 1;
                        }
                    }
                    callback_cursor.store(pos, Ordering::Relaxed);
                },
                |e| warn!("Audio stream error: {}", e),
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("failed to build output stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("failed to start output stream: {}", e)))?;

        debug!("Playback started, {} frames", total / 2);

        while cursor.load(Ordering::Relaxed) < total {
            std::thread::sleep(COMPLETION_POLL);
        }

        // Give the device a moment to drain the last buffer before the
        // stream is released.
        std::thread::sleep(Duration::from_millis(50));
        drop(stream);

        debug!("Playback complete");
        Ok(())
    }
}
