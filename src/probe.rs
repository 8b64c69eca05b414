//! Probe - the "Stream" button entry point
//!
//! A `Probe` is handed its generator at construction and renders one buffer
//! per call, returning level and frequency measurements the UI can show.
//! There is no process-wide generator: whoever owns the probe owns the tone.

use serde::{Deserialize, Serialize};

use crate::analysis::{self, SpectrumAnalyzer};
use crate::audio::{SampleBuffer, SineWaveGenerator, WaveformConfig};
use crate::config::AppConfig;
use crate::error::{log_generator_error, GeneratorError};

/// Measurements of one probe buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub sample_rate_hz: u32,
    pub channel_count: u16,
    pub frames: usize,
    pub sample_count: usize,
    pub peak: f32,
    pub rms: f32,
    /// `None` when the buffer is too short or silent
    pub dominant_frequency_hz: Option<f32>,
}

/// One-buffer-per-call tone probe
pub struct Probe {
    generator: SineWaveGenerator,
    analyzer: SpectrumAnalyzer,
}

impl Probe {
    pub fn new(generator: SineWaveGenerator) -> Self {
        Self {
            generator,
            analyzer: SpectrumAnalyzer::new(),
        }
    }

    pub fn config(&self) -> &WaveformConfig {
        self.generator.config()
    }

    /// Render `frames` frames and measure them
    ///
    /// Consecutive calls continue the tone where the previous one stopped.
    ///
    /// # Errors
    /// `GeneratorError::InvalidArgument` if `frames` is 0
    pub fn run(&mut self, frames: usize) -> Result<ProbeReport, GeneratorError> {
        let buffer = self.render(frames)?;
        let report = self.measure(&buffer);
        tracing::debug!(
            "[Probe] frames={} peak={:.4} rms={:.4} dominant={:?} Hz",
            report.frames,
            report.peak,
            report.rms,
            report.dominant_frequency_hz
        );
        Ok(report)
    }

    /// Render `frames` frames without measuring them
    pub fn render(&mut self, frames: usize) -> Result<SampleBuffer, GeneratorError> {
        self.generator.generate(frames).inspect_err(|err| {
            log_generator_error(err, "probe");
        })
    }

    /// Restart the tone from phase 0
    pub fn reset(&mut self) {
        self.generator.reset();
    }

    /// Swap the probe tone, keeping its phase
    pub fn retune(&mut self, config: WaveformConfig) -> Result<(), GeneratorError> {
        self.generator.retune(config)
    }

    fn measure(&mut self, buffer: &SampleBuffer) -> ProbeReport {
        let mono: Vec<f32> = buffer.channel(0).collect();
        ProbeReport {
            sample_rate_hz: buffer.sample_rate_hz(),
            channel_count: buffer.channel_count(),
            frames: buffer.frames(),
            sample_count: buffer.len(),
            peak: analysis::peak(buffer.as_slice()),
            rms: analysis::rms(&mono),
            dominant_frequency_hz: self
                .analyzer
                .dominant_frequency(&mono, buffer.sample_rate_hz()),
        }
    }
}

/// Measure one buffer of the configured tone with a fresh generator
///
/// # Errors
/// `InvalidConfig` for an out-of-range tone, `InvalidArgument` for a zero
/// buffer size
pub fn probe_configured_tone(config: &AppConfig) -> Result<ProbeReport, GeneratorError> {
    let generator = SineWaveGenerator::new(config.tone.to_waveform())?;
    Probe::new(generator).run(config.probe.buffer_frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(config: WaveformConfig) -> Probe {
        Probe::new(SineWaveGenerator::new(config).unwrap())
    }

    #[test]
    fn test_report_describes_tone() {
        let mut probe = probe(WaveformConfig::new(48000, 440.0, 0.5, 2));
        let report = probe.run(4800).unwrap();

        assert_eq!(report.frames, 4800);
        assert_eq!(report.sample_count, 9600);
        assert_eq!(report.channel_count, 2);
        assert!(report.peak <= 0.5 + 1e-6);
        assert!(report.peak > 0.49);
        // 4800 frames at 440 Hz is exactly 44 periods
        assert!((report.rms - 0.5 / std::f32::consts::SQRT_2).abs() < 1e-3);

        let dominant = report.dominant_frequency_hz.unwrap();
        assert!((dominant - 440.0).abs() < 48000.0 / 8192.0);
    }

    #[test]
    fn test_silent_tone_has_no_dominant_frequency() {
        let mut probe = probe(WaveformConfig::new(48000, 440.0, 0.0, 1));
        let report = probe.run(1024).unwrap();
        assert_eq!(report.peak, 0.0);
        assert_eq!(report.dominant_frequency_hz, None);
    }

    #[test]
    fn test_zero_frames_rejected() {
        let mut probe = probe(WaveformConfig::new(48000, 440.0, 0.5, 1));
        assert!(matches!(
            probe.run(0),
            Err(GeneratorError::InvalidArgument { .. })
        ));
        assert!(probe.run(16).is_ok());
    }

    #[test]
    fn test_reset_restarts_tone() {
        let mut probe = probe(WaveformConfig::new(44100, 1000.0, 0.8, 1));
        let first = probe.render(64).unwrap();
        probe.render(31).unwrap();
        probe.reset();
        assert_eq!(probe.render(64).unwrap(), first);
    }

    #[test]
    fn test_configured_tone_uses_config_sizes() {
        let mut config = AppConfig::default();
        config.tone.channel_count = 2;
        config.probe.buffer_frames = 2048;

        let report = probe_configured_tone(&config).unwrap();
        assert_eq!(report.frames, 2048);
        assert_eq!(report.sample_count, 4096);
        assert!(report.peak <= config.tone.amplitude);

        config.probe.buffer_frames = 0;
        assert!(matches!(
            probe_configured_tone(&config),
            Err(GeneratorError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut probe = probe(WaveformConfig::new(8000, 1000.0, 1.0, 1));
        let report = probe.run(256).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"sample_rate_hz\":8000"));
        assert!(json.contains("dominant_frequency_hz"));
    }
}
