//! Audio decoding using symphonia
//!
//! Decodes a fetched byte stream (MP3 in practice, anything symphonia's
//! probe recognizes) to interleaved stereo f32 PCM. The whole resource has
//! already been fetched, so decoding runs over an in-memory cursor.

use std::io::Cursor;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::IntoSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, ReadOnlySource};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Decoder for one fetched audio resource.
pub struct StreamDecoder;

impl StreamDecoder {
    /// Decode a complete byte stream to interleaved stereo f32 samples.
    ///
    /// Mono sources are duplicated to stereo; sources with more than two
    /// channels keep their first two. Returns the samples and the source
    /// sample rate.
    ///
    /// # Errors
    /// - Unrecognized or unsupported container/codec
    /// - No decodable audio track
    pub fn decode_bytes(data: Vec<u8>) -> Result<(Vec<f32>, u32)> {
        debug!("Decoding {} fetched bytes", data.len());

        let source = ReadOnlySource::new(Cursor::new(data));
        let mss = MediaSourceStream::new(Box::new(source), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| Error::Decode(format!("Failed to probe format: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| Error::Decode("Sample rate not found".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    debug!("Reached end of stream");
                    break;
                }
                Err(e) => {
                    warn!("Error reading packet: {}", e);
                    break;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => Self::append_stereo(&decoded, &mut samples),
                Err(e) => {
                    warn!("Decode error: {}", e);
                    continue;
                }
            }
        }

        debug!(
            "Decoded {} samples ({} frames) at {} Hz",
            samples.len(),
            samples.len() / 2,
            sample_rate
        );

        Ok((samples, sample_rate))
    }

    /// Append one decoded buffer as interleaved stereo f32.
    fn append_stereo(decoded: &AudioBufferRef, output: &mut Vec<f32>) {
        match decoded {
            AudioBufferRef::U8(buf) => Self::interleave(buf, output),
            AudioBufferRef::U16(buf) => Self::interleave(buf, output),
            AudioBufferRef::U24(buf) => Self::interleave(buf, output),
            AudioBufferRef::U32(buf) => Self::interleave(buf, output),
            AudioBufferRef::S8(buf) => Self::interleave(buf, output),
            AudioBufferRef::S16(buf) => Self::interleave(buf, output),
            AudioBufferRef::S24(buf) => Self::interleave(buf, output),
            AudioBufferRef::S32(buf) => Self::interleave(buf, output),
            AudioBufferRef::F32(buf) => Self::interleave(buf, output),
            AudioBufferRef::F64(buf) => Self::interleave(buf, output),
        }
    }

    /// Interleave planar samples to stereo f32, duplicating mono.
    fn interleave<S>(buf: &AudioBuffer<S>, output: &mut Vec<f32>)
    where
        S: Sample + IntoSample<f32>,
    {
        let num_channels = buf.spec().channels.count();
        let num_frames = buf.frames();
        output.reserve(num_frames * 2);

        for frame_idx in 0..num_frames {
            let left: f32 = buf.chan(0)[frame_idx].into_sample();
            let right: f32 = if num_channels > 1 {
                buf.chan(1)[frame_idx].into_sample()
            } else {
                left
            };
            output.push(left);
            output.push(right);
        }
    }
}
