// SampleBuffer - owned slice of rendered tone
//
// Produced by SineWaveGenerator::generate. The caller owns the samples; the
// generator keeps no reference to them.

use serde::{Deserialize, Serialize};

/// Interleaved f32 samples for one contiguous time slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    channel_count: u16,
    sample_rate_hz: u32,
}

impl SampleBuffer {
    pub(crate) fn new(samples: Vec<f32>, channel_count: u16, sample_rate_hz: u32) -> Self {
        Self {
            samples,
            channel_count,
            sample_rate_hz,
        }
    }

    /// Total number of samples across all channels
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channel_count.max(1) as usize
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.samples
    }

    /// Samples of one channel, de-interleaved
    ///
    /// Returns an empty iterator for an out-of-range channel.
    pub fn channel(&self, channel: u16) -> impl Iterator<Item = f32> + '_ {
        let stride = self.channel_count.max(1) as usize;
        let start = if channel < self.channel_count {
            channel as usize
        } else {
            self.samples.len()
        };
        self.samples[start..].iter().step_by(stride).copied()
    }

    /// Convert to signed 16-bit PCM
    ///
    /// Values are scaled by `i16::MAX` and clamped to [-1.0, 1.0] first, so
    /// full-scale output never wraps.
    pub fn to_i16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
            .collect()
    }
}
