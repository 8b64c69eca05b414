//! Sine wave generator - phase-continuous tone synthesis
//!
//! This module provides the deterministic sine source behind the probe and
//! the playback callbacks. Key properties:
//! - Phase accumulator kept in f64 and wrapped to [0, 2π) after every frame
//! - Successive buffers are phase-continuous (no click at buffer boundaries)
//! - Stereo output is interleaved with identical values on both channels
//! - `fill` never allocates, so it is safe to call from an audio callback
//!
//! A generator is not `Sync`-shared: every mutating call takes `&mut self`, so
//! concurrent use requires the caller to serialize access or own one generator
//! per stream.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::sample_buffer::SampleBuffer;
use crate::error::GeneratorError;

/// Waveform parameters for a [`SineWaveGenerator`]
///
/// Plain value type; a generator keeps its own copy, so the config it runs
/// with cannot change underneath it. Use the `with_*` helpers to derive a new
/// config and [`SineWaveGenerator::retune`] to swap it in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformConfig {
    /// Sample rate in Hz (must be > 0)
    pub sample_rate_hz: u32,
    /// Tone frequency in Hz (must be finite and > 0)
    pub frequency_hz: f32,
    /// Peak amplitude in [0.0, 1.0]
    pub amplitude: f32,
    /// 1 (mono) or 2 (interleaved stereo)
    pub channel_count: u16,
}

impl WaveformConfig {
    pub fn new(sample_rate_hz: u32, frequency_hz: f32, amplitude: f32, channel_count: u16) -> Self {
        Self {
            sample_rate_hz,
            frequency_hz,
            amplitude,
            channel_count,
        }
    }

    /// Check every field against its allowed range
    ///
    /// # Errors
    /// `GeneratorError::InvalidConfig` naming the first offending field
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.sample_rate_hz == 0 {
            return Err(GeneratorError::invalid_config(
                "sample rate must be greater than 0",
            ));
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(GeneratorError::invalid_config(format!(
                "frequency must be a positive number of Hz (got {})",
                self.frequency_hz
            )));
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(GeneratorError::invalid_config(format!(
                "amplitude must be within [0, 1] (got {})",
                self.amplitude
            )));
        }
        if !matches!(self.channel_count, 1 | 2) {
            return Err(GeneratorError::invalid_config(format!(
                "channel count must be 1 or 2 (got {})",
                self.channel_count
            )));
        }
        Ok(())
    }

    pub fn with_frequency(self, frequency_hz: f32) -> Self {
        Self {
            frequency_hz,
            ..self
        }
    }

    pub fn with_amplitude(self, amplitude: f32) -> Self {
        Self { amplitude, ..self }
    }

    pub fn with_sample_rate(self, sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            ..self
        }
    }

    /// Phase advance per frame in radians
    #[inline]
    fn phase_increment(&self) -> f64 {
        TAU * self.frequency_hz as f64 / self.sample_rate_hz as f64
    }
}

/// Phase-continuous sine tone generator
///
/// # Example
/// ```
/// use sine_probe::audio::{SineWaveGenerator, WaveformConfig};
///
/// let config = WaveformConfig::new(8000, 1000.0, 1.0, 1);
/// let mut generator = SineWaveGenerator::new(config).unwrap();
/// let buffer = generator.generate(8).unwrap();
/// assert_eq!(buffer.len(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct SineWaveGenerator {
    config: WaveformConfig,
    /// Current phase in radians, always within [0, 2π)
    phase: f64,
    /// Cached 2π·f/fs
    increment: f64,
}

impl SineWaveGenerator {
    /// Create a generator starting at phase 0
    ///
    /// # Errors
    /// `GeneratorError::InvalidConfig` if any config field is out of range
    pub fn new(config: WaveformConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        tracing::debug!(
            "[SineWaveGenerator] init: sample_rate={} Hz, frequency={} Hz, amplitude={}, channels={}",
            config.sample_rate_hz,
            config.frequency_hz,
            config.amplitude,
            config.channel_count
        );
        Ok(Self {
            increment: config.phase_increment(),
            config,
            phase: 0.0,
        })
    }

    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }

    /// Current phase in radians
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Produce `frames` frames of the tone
    ///
    /// Returns `frames * channel_count` samples, interleaved for stereo.
    ///
    /// # Errors
    /// `GeneratorError::InvalidArgument` if `frames` is 0 or
    /// `frames * channel_count` does not fit in `usize`. The generator is
    /// left untouched and stays usable.
    pub fn generate(&mut self, frames: usize) -> Result<SampleBuffer, GeneratorError> {
        if frames == 0 {
            return Err(GeneratorError::invalid_argument(
                "sample count must be greater than 0",
            ));
        }

        let len = frames
            .checked_mul(self.config.channel_count as usize)
            .ok_or_else(|| GeneratorError::invalid_argument("sample count too large"))?;
        let mut samples = vec![0.0; len];
        self.fill(&mut samples);

        Ok(SampleBuffer::new(
            samples,
            self.config.channel_count,
            self.config.sample_rate_hz,
        ))
    }

    /// Write whole interleaved frames into `out`
    ///
    /// Real-time safe: no allocation, no locking. Writes
    /// `out.len() / channel_count` frames; a trailing partial frame is left
    /// untouched. Returns the number of frames written.
    pub fn fill(&mut self, out: &mut [f32]) -> usize {
        let channels = self.config.channel_count as usize;
        let mut written = 0;
        for frame in out.chunks_exact_mut(channels) {
            let value = self.next_sample();
            frame.fill(value);
            written += 1;
        }
        written
    }

    /// Produce the value for one frame and advance the phase
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = self.config.amplitude * self.phase.sin() as f32;
        self.phase = (self.phase + self.increment) % TAU;
        value
    }

    /// Restart the tone from phase 0
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Swap in a new config while keeping the current phase
    ///
    /// # Errors
    /// `GeneratorError::InvalidConfig` if `config` is out of range; the
    /// previous config stays active.
    pub fn retune(&mut self, config: WaveformConfig) -> Result<(), GeneratorError> {
        config.validate()?;
        self.increment = config.phase_increment();
        self.config = config;
        Ok(())
    }
}

impl Iterator for SineWaveGenerator {
    type Item = f32;

    /// Endless stream of frame values (one per frame, not per channel)
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn mono(sample_rate: u32, frequency: f32, amplitude: f32) -> SineWaveGenerator {
        SineWaveGenerator::new(WaveformConfig::new(sample_rate, frequency, amplitude, 1)).unwrap()
    }

    #[test]
    fn test_quarter_turn_sequence() {
        let mut generator = mono(8000, 1000.0, 1.0);
        let buffer = generator.generate(8).unwrap();

        for (k, &sample) in buffer.as_slice().iter().enumerate() {
            let expected = (k as f32 * PI / 4.0).sin();
            assert!(
                (sample - expected).abs() < 1e-6,
                "sample {} = {}, expected {}",
                k,
                sample,
                expected
            );
        }
    }

    #[test]
    fn test_rejects_invalid_configs() {
        let valid = WaveformConfig::new(44100, 440.0, 0.5, 1);
        let cases = [
            valid.with_sample_rate(0),
            valid.with_frequency(-1.0),
            valid.with_frequency(0.0),
            valid.with_frequency(f32::NAN),
            valid.with_frequency(f32::INFINITY),
            valid.with_amplitude(1.5),
            valid.with_amplitude(-0.1),
            valid.with_amplitude(f32::NAN),
            WaveformConfig {
                channel_count: 3,
                ..valid
            },
            WaveformConfig {
                channel_count: 0,
                ..valid
            },
        ];

        for config in cases {
            let result = SineWaveGenerator::new(config);
            assert!(
                matches!(result, Err(GeneratorError::InvalidConfig { .. })),
                "config {:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_accepts_amplitude_bounds() {
        let base = WaveformConfig::new(48000, 440.0, 0.0, 2);
        assert!(SineWaveGenerator::new(base).is_ok());
        assert!(SineWaveGenerator::new(base.with_amplitude(1.0)).is_ok());
    }

    #[test]
    fn test_zero_frames_is_invalid_argument_and_recoverable() {
        let mut generator = mono(48000, 440.0, 0.5);
        let result = generator.generate(0);
        assert!(matches!(
            result,
            Err(GeneratorError::InvalidArgument { .. })
        ));
        assert_eq!(generator.phase(), 0.0);

        let buffer = generator.generate(16).unwrap();
        assert_eq!(buffer.len(), 16);
    }

    #[test]
    fn test_oversized_frame_count_is_invalid_argument_and_recoverable() {
        let config = WaveformConfig::new(48000, 440.0, 0.5, 2);
        let mut generator = SineWaveGenerator::new(config).unwrap();

        let result = generator.generate(usize::MAX / 2 + 1);
        assert!(matches!(
            result,
            Err(GeneratorError::InvalidArgument { .. })
        ));
        assert_eq!(generator.phase(), 0.0);

        let buffer = generator.generate(16).unwrap();
        assert_eq!(buffer.len(), 32);
        let mut fresh = SineWaveGenerator::new(config).unwrap();
        assert_eq!(buffer, fresh.generate(16).unwrap());
    }

    #[test]
    fn test_stereo_is_interleaved_and_identical() {
        let config = WaveformConfig::new(48000, 997.0, 0.8, 2);
        let mut generator = SineWaveGenerator::new(config).unwrap();
        let buffer = generator.generate(64).unwrap();

        assert_eq!(buffer.len(), 128);
        assert_eq!(buffer.frames(), 64);
        for frame in buffer.as_slice().chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn test_phase_stays_wrapped() {
        // Frequency above the sample rate advances more than 2π per frame
        let mut generator = mono(1000, 2750.0, 1.0);
        for _ in 0..10_000 {
            generator.next_sample();
            let phase = generator.phase();
            assert!((0.0..TAU).contains(&phase), "phase {} escaped [0, 2π)", phase);
        }
    }

    #[test]
    fn test_fill_ignores_partial_frame() {
        let config = WaveformConfig::new(48000, 440.0, 1.0, 2);
        let mut generator = SineWaveGenerator::new(config).unwrap();
        let mut out = [7.0_f32; 5];

        let written = generator.fill(&mut out);

        assert_eq!(written, 2);
        assert_eq!(out[4], 7.0, "trailing partial frame must be untouched");
    }

    #[test]
    fn test_retune_keeps_phase() {
        let mut generator = mono(48000, 440.0, 0.5);
        generator.generate(100).unwrap();
        let phase = generator.phase();

        let retuned = generator.config().with_frequency(880.0);
        generator.retune(retuned).unwrap();

        assert_eq!(generator.phase(), phase);
        assert_eq!(generator.config().frequency_hz, 880.0);
    }

    #[test]
    fn test_retune_rejects_invalid_and_keeps_old_config() {
        let mut generator = mono(48000, 440.0, 0.5);
        let bad = generator.config().with_amplitude(2.0);

        assert!(generator.retune(bad).is_err());
        assert_eq!(generator.config().amplitude, 0.5);
    }

    #[test]
    fn test_iterator_matches_generate() {
        let mut a = mono(44100, 440.0, 0.5);
        let mut b = a.clone();

        let from_iter: Vec<f32> = a.by_ref().take(32).collect();
        let from_generate = b.generate(32).unwrap();

        assert_eq!(from_iter.as_slice(), from_generate.as_slice());
    }
}
