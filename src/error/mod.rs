// Error types for the equalizer bridge
//
// This module defines the error replies sent back over the method channel,
// together with the carrier for failures raised by the native effect.

mod equalizer;
mod native;

pub use equalizer::{log_equalizer_error, EqualizerError, EqualizerErrorCodes};
pub use native::NativeError;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error replies across
/// the FFI boundary.
pub trait ErrorCode {
    /// Get the wire error code (e.g. `INIT_ERROR`)
    fn code(&self) -> &'static str;

    /// Get the human-readable error message, if the failure carried one
    fn message(&self) -> Option<String>;
}
