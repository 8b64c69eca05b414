//! Backend abstractions for the playback engine.

use serde::{Deserialize, Serialize};

use crate::audio::{ToneCommandReceiver, WaveformConfig};
use crate::error::StreamError;

/// Everything a backend needs to open an output stream.
///
/// The backend builds a generator from `waveform` (adjusting the sample rate
/// to the device when needed) and moves it, together with `commands`, into
/// its audio callback.
pub struct StreamRequest {
    pub waveform: WaveformConfig,
    pub commands: ToneCommandReceiver,
    pub low_latency: bool,
}

/// Actual stream parameters negotiated with the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub sample_rate_hz: u32,
    pub channel_count: u16,
}

/// Default output device description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub sample_rate_hz: Option<u32>,
    pub channel_count: Option<u16>,
}

/// Trait implemented by platform-specific audio backends.
///
/// `open` both opens and starts the stream. `EngineHandle` guarantees the
/// call order (`open`, then any of `pause`/`resume`, then `close`), so
/// backends only need to handle the happy path plus device failures.
pub trait AudioBackend {
    fn open(&mut self, request: StreamRequest) -> Result<StreamInfo, StreamError>;
    fn pause(&mut self) -> Result<(), StreamError>;
    fn resume(&mut self) -> Result<(), StreamError>;
    fn close(&mut self) -> Result<(), StreamError>;
    fn describe_device(&self) -> Result<DeviceInfo, StreamError>;
}

#[cfg(target_os = "android")]
mod oboe;
#[cfg(target_os = "android")]
pub use self::oboe::OboeBackend;

#[cfg(not(target_os = "android"))]
mod cpal;
#[cfg(not(target_os = "android"))]
pub use self::cpal::CpalBackend;

mod stub;
pub use stub::{StubBackend, StubController};

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        /// Oboe output on Android.
        pub fn platform_backend() -> Box<dyn AudioBackend> {
            Box::new(OboeBackend::new())
        }
    } else {
        /// CPAL output on desktop.
        pub fn platform_backend() -> Box<dyn AudioBackend> {
            Box::new(CpalBackend::new())
        }
    }
}
