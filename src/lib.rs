// Sine Probe Core - Rust tone generator
// Phase-continuous sine synthesis, lock-free playback and probe analysis

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod probe;

#[cfg(target_os = "android")]
mod jni_bridge;

// Re-exports for convenience
pub use audio::{SampleBuffer, SineWaveGenerator, WaveformConfig};
pub use config::AppConfig;
pub use engine::{EngineEvent, EngineHandle, StreamState};
pub use error::{ErrorCode, GeneratorError, StreamError};
pub use probe::{Probe, ProbeReport};

/// Install the process-wide tracing subscriber
///
/// Android routes events to logcat under the `SineProbe` tag; other targets
/// log to stderr. Calling this more than once is harmless.
#[cfg(target_os = "android")]
pub fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    match tracing_android::layer("SineProbe") {
        Ok(layer) => {
            let _ = tracing_subscriber::registry().with(layer).try_init();
        }
        Err(err) => log::error!("Failed to create logcat layer: {}", err),
    }
}

/// Install the process-wide tracing subscriber
///
/// Android routes events to logcat under the `SineProbe` tag; other targets
/// log to stderr. Calling this more than once is harmless.
#[cfg(not(target_os = "android"))]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        tracing::info!("logging initialized twice");
    }
}
