// Error types for the sine probe library
//
// This module defines custom error types for tone generation and stream
// operations, providing structured error handling with error codes suitable
// for FFI communication.

mod generator;
mod stream;

pub use generator::{log_generator_error, GeneratorError, GeneratorErrorCodes};
pub use stream::{log_stream_error, StreamError, StreamErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
