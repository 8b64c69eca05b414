//! Configuration for the tone, the probe, and the output stream
//!
//! Every field has a default (440 Hz at half gain, mono, 48 kHz requested
//! rate), so a partial JSON document such as `{"tone": {"frequency_hz": 880}}`
//! is valid. The host app passes the JSON across the JNI boundary; nothing is
//! read from disk.

use serde::{Deserialize, Serialize};

use crate::audio::WaveformConfig;

/// Complete library configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tone: ToneConfig,
    pub probe: ProbeConfig,
    pub stream: StreamSettings,
}

/// Tone parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Requested sample rate; the playback device may override it
    pub sample_rate_hz: u32,
    pub frequency_hz: f32,
    pub amplitude: f32,
    pub channel_count: u16,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 48000,
            frequency_hz: 440.0,
            amplitude: 0.5,
            channel_count: 1,
        }
    }
}

impl ToneConfig {
    /// Waveform config for a generator (not validated here)
    pub fn to_waveform(&self) -> WaveformConfig {
        WaveformConfig::new(
            self.sample_rate_hz,
            self.frequency_hz,
            self.amplitude,
            self.channel_count,
        )
    }
}

/// Probe ("Stream" button) parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Frames rendered per probe call
    pub buffer_frames: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            buffer_frames: 1024,
        }
    }
}

/// Output stream parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Ask the backend for its low-latency performance mode
    pub low_latency: bool,
    /// Depth of the tone command queue
    pub command_capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            low_latency: true,
            command_capacity: crate::audio::DEFAULT_COMMAND_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Parse configuration from a JSON document
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed JSON or mistyped fields
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        tracing::info!("[Config] Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Parse configuration, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json_str(json).unwrap_or_else(|err| {
            tracing::warn!("[Config] Failed to parse JSON: {}. Using defaults.", err);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.tone.frequency_hz, 440.0);
        assert_eq!(config.tone.amplitude, 0.5);
        assert_eq!(config.tone.channel_count, 1);
        assert_eq!(config.tone.sample_rate_hz, 48000);
        assert_eq!(config.probe.buffer_frames, 1024);
        assert!(config.stream.low_latency);
        assert!(config.tone.to_waveform().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AppConfig::from_json_str(r#"{"tone": {"frequency_hz": 880.0}}"#).unwrap();
        assert_eq!(config.tone.frequency_hz, 880.0);
        assert_eq!(config.tone.amplitude, 0.5);
        assert_eq!(config.probe, ProbeConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(AppConfig::from_json_str("{not json").is_err());
        assert_eq!(AppConfig::from_json_or_default("{not json"), AppConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = AppConfig::default();
        config.tone.channel_count = 2;
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
