//! PCM audio decoding for synthesized speech
//!
//! Speech synthesis returns base64-encoded raw 16-bit little-endian PCM.
//! This module turns that payload into normalized f32 samples arranged per
//! channel, ready for a playback sink.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

/// Decoded audio, addressable by channel and frame index
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    data: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.data.len()
    }

    /// Frames per channel
    pub fn frames(&self) -> usize {
        self.data.first().map(Vec::len).unwrap_or(0)
    }

    /// Samples for one channel, in frame order
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.data[channel]
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Decode a base64 payload of interleaved little-endian 16-bit signed PCM.
///
/// Each sample is normalized to [-1.0, 1.0] as `int16 / 32768.0`. The frame
/// count is `samples / channels` with integer truncation: a trailing partial
/// frame (or odd trailing byte) is silently dropped, matching the upstream
/// synthesis contract. Fails only on invalid base64 or a zero channel count.
pub fn decode_pcm16(base64: &str, sample_rate: u32, channels: usize) -> Result<AudioBuffer> {
    if channels == 0 {
        return Err(Error::InvalidData("Channel count must be positive".into()));
    }

    let bytes = STANDARD.decode(base64)?;
    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let frames = samples.len() / channels;
    let mut data = vec![Vec::with_capacity(frames); channels];

    for (channel, sink) in data.iter_mut().enumerate() {
        for frame in 0..frames {
            sink.push(samples[frame * channels + channel] as f32 / 32768.0);
        }
    }

    Ok(AudioBuffer { sample_rate, data })
}
