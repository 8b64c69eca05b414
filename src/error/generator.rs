// Generator error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Generator error code constants exposed across the JNI boundary
///
/// Error code range: 1001-1002
pub struct GeneratorErrorCodes {}

impl GeneratorErrorCodes {
    /// Waveform configuration rejected at construction time
    pub const INVALID_CONFIG: i32 = 1001;

    /// Per-call argument rejected (generator stays usable)
    pub const INVALID_ARGUMENT: i32 = 1002;
}

/// Log a generator error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_generator_error(err: &GeneratorError, context: &str) {
    error!(
        "Generator error in {}: code={}, component=SineWaveGenerator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Tone generation errors
///
/// `InvalidConfig` is unrecoverable for the configuration that produced it;
/// `InvalidArgument` only fails the offending call.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// Waveform configuration is out of range
    InvalidConfig { reason: String },

    /// Argument to a generation call is out of range
    InvalidArgument { reason: String },
}

impl GeneratorError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        GeneratorError::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        GeneratorError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for GeneratorError {
    fn code(&self) -> i32 {
        match self {
            GeneratorError::InvalidConfig { .. } => GeneratorErrorCodes::INVALID_CONFIG,
            GeneratorError::InvalidArgument { .. } => GeneratorErrorCodes::INVALID_ARGUMENT,
        }
    }

    fn message(&self) -> String {
        match self {
            GeneratorError::InvalidConfig { reason } => {
                format!("Invalid waveform config: {}", reason)
            }
            GeneratorError::InvalidArgument { reason } => {
                format!("Invalid argument: {}", reason)
            }
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeneratorError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for GeneratorError {}
