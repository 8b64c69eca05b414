// Stream error types and constants

use crate::error::{ErrorCode, GeneratorError};
use log::error;
use std::fmt;

/// Stream error code constants exposed across the JNI boundary
///
/// Error code range: 2001-2006
pub struct StreamErrorCodes {}

impl StreamErrorCodes {
    /// Output stream is not open
    pub const NOT_RUNNING: i32 = 2001;

    /// Hardware error occurred
    pub const HARDWARE_ERROR: i32 = 2002;

    /// Failed to open output stream
    pub const STREAM_OPEN_FAILED: i32 = 2003;

    /// Mutex was poisoned
    pub const LOCK_POISONED: i32 = 2004;

    /// JNI initialization failed on Android
    pub const JNI_INIT_FAILED: i32 = 2005;

    /// Stream or command channel failed unexpectedly
    pub const STREAM_FAILURE: i32 = 2006;
}

/// Log a stream error with structured context
///
/// This function logs stream errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_stream_error(err: &StreamError, context: &str) {
    error!(
        "Stream error in {}: code={}, component=EngineHandle, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Playback stream errors
///
/// These errors cover stream lifecycle, hardware access, and the tone
/// command pipeline. Generator validation failures are wrapped so callers
/// of the engine deal with a single error type.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Output stream is not open
    NotRunning,

    /// Hardware error occurred
    HardwareError { details: String },

    /// Failed to open output stream
    StreamOpenFailed { reason: String },

    /// Mutex was poisoned
    LockPoisoned { component: String },

    /// JNI initialization failed on Android
    JniInitFailed { reason: String },

    /// Stream or command channel failed unexpectedly
    StreamFailure { reason: String },

    /// Tone parameters rejected by the generator
    Generator(GeneratorError),
}

impl ErrorCode for StreamError {
    fn code(&self) -> i32 {
        match self {
            StreamError::NotRunning => StreamErrorCodes::NOT_RUNNING,
            StreamError::HardwareError { .. } => StreamErrorCodes::HARDWARE_ERROR,
            StreamError::StreamOpenFailed { .. } => StreamErrorCodes::STREAM_OPEN_FAILED,
            StreamError::LockPoisoned { .. } => StreamErrorCodes::LOCK_POISONED,
            StreamError::JniInitFailed { .. } => StreamErrorCodes::JNI_INIT_FAILED,
            StreamError::StreamFailure { .. } => StreamErrorCodes::STREAM_FAILURE,
            StreamError::Generator(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            StreamError::NotRunning => "Output stream not running. Call start() first.".to_string(),
            StreamError::HardwareError { details } => {
                format!("Hardware error: {}", details)
            }
            StreamError::StreamOpenFailed { reason } => {
                format!("Failed to open audio stream: {}", reason)
            }
            StreamError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
            StreamError::JniInitFailed { reason } => {
                format!("JNI initialization failed: {}", reason)
            }
            StreamError::StreamFailure { reason } => {
                format!("Audio stream failed: {}", reason)
            }
            StreamError::Generator(err) => err.message(),
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StreamError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Generator(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GeneratorError> for StreamError {
    fn from(err: GeneratorError) -> Self {
        StreamError::Generator(err)
    }
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::HardwareError {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorErrorCodes;

    #[test]
    fn test_stream_error_codes() {
        assert_eq!(StreamError::NotRunning.code(), StreamErrorCodes::NOT_RUNNING);
        assert_eq!(
            StreamError::HardwareError {
                details: "test".to_string()
            }
            .code(),
            StreamErrorCodes::HARDWARE_ERROR
        );
        assert_eq!(
            StreamError::StreamOpenFailed {
                reason: "test".to_string()
            }
            .code(),
            StreamErrorCodes::STREAM_OPEN_FAILED
        );
        assert_eq!(
            StreamError::LockPoisoned {
                component: "test".to_string()
            }
            .code(),
            StreamErrorCodes::LOCK_POISONED
        );
        assert_eq!(
            StreamError::JniInitFailed {
                reason: "test".to_string()
            }
            .code(),
            StreamErrorCodes::JNI_INIT_FAILED
        );
        assert_eq!(
            StreamError::StreamFailure {
                reason: "test".to_string()
            }
            .code(),
            StreamErrorCodes::STREAM_FAILURE
        );
    }

    #[test]
    fn test_generator_errors_keep_their_code() {
        let err: StreamError = GeneratorError::invalid_config("bad").into();
        assert_eq!(err.code(), GeneratorErrorCodes::INVALID_CONFIG);
        assert!(err.message().contains("bad"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("thread spawn failed");
        let stream_err: StreamError = io_err.into();
        match stream_err {
            StreamError::HardwareError { details } => {
                assert!(details.contains("thread spawn failed"));
            }
            _ => panic!("Expected HardwareError"),
        }
    }

    #[test]
    fn test_stream_error_display() {
        let err = StreamError::NotRunning;
        let display = format!("{}", err);
        assert!(display.contains("StreamError"));
        assert!(display.contains("2001"));
    }
}
