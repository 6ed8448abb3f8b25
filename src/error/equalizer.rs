// Equalizer error types and constants

use crate::error::{ErrorCode, NativeError};
use flutter_rust_bridge::frb;
use log::error;
use std::fmt;

/// Equalizer error code constants exposed to Dart via FFI
///
/// These strings are the wire contract with the existing Dart caller and
/// must not change.
#[frb(unignore)]
pub struct EqualizerErrorCodes {}

#[frb]
impl EqualizerErrorCodes {
    /// A required argument was absent
    pub const INVALID_ARGS: &'static str = "INVALID_ARGS";

    /// Native effect construction failed
    pub const INIT_ERROR: &'static str = "INIT_ERROR";

    /// Toggling the effect failed
    pub const ENABLE_ERROR: &'static str = "ENABLE_ERROR";

    /// Reading the enabled flag failed
    pub const GET_ENABLED_ERROR: &'static str = "GET_ENABLED_ERROR";

    /// Band level range unavailable or query failed
    pub const RANGE_ERROR: &'static str = "RANGE_ERROR";

    /// Center frequency query failed
    pub const FREQ_ERROR: &'static str = "FREQ_ERROR";

    /// Band level query failed
    pub const LEVEL_ERROR: &'static str = "LEVEL_ERROR";

    /// Band level update failed
    pub const SET_LEVEL_ERROR: &'static str = "SET_LEVEL_ERROR";

    // Getter methods for FFI exposure (flutter_rust_bridge requires methods not const)

    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn invalid_args() -> String {
        Self::INVALID_ARGS.to_string()
    }

    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn init_error() -> String {
        Self::INIT_ERROR.to_string()
    }

    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn enable_error() -> String {
        Self::ENABLE_ERROR.to_string()
    }

    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn get_enabled_error() -> String {
        Self::GET_ENABLED_ERROR.to_string()
    }

    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn range_error() -> String {
        Self::RANGE_ERROR.to_string()
    }

    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn freq_error() -> String {
        Self::FREQ_ERROR.to_string()
    }

    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn level_error() -> String {
        Self::LEVEL_ERROR.to_string()
    }

    #[flutter_rust_bridge::frb(sync, getter)]
    pub fn set_level_error() -> String {
        Self::SET_LEVEL_ERROR.to_string()
    }
}

/// Log an equalizer error with structured context
///
/// The context is normally the method name of the call that failed.
pub fn log_equalizer_error(err: &EqualizerError, context: &str) {
    error!(
        "Equalizer error in {}: code={}, component=EqualizerBridge, message={}",
        context,
        err.code(),
        err.message().as_deref().unwrap_or("null")
    );
}

/// Errors replied to the Dart caller
///
/// One variant per wire error code. Variants wrapping a native failure keep
/// the platform message, which may be null.
#[derive(Debug, Clone, PartialEq)]
pub enum EqualizerError {
    /// A required argument was absent or not an integer
    InvalidArgs { reason: String },

    /// Native effect construction failed
    InitFailed { details: Option<String> },

    /// `setEnabled` failed
    EnableFailed { details: Option<String> },

    /// `getEnabled` failed
    GetEnabledFailed { details: Option<String> },

    /// No effect, or the effect reported a null range
    RangeUnavailable,

    /// `getBandLevelRange` failed
    RangeFailed { details: Option<String> },

    /// `getNumberOfBands` or `getCenterFreq` failed
    FreqFailed { details: Option<String> },

    /// `getBandLevel` failed
    LevelFailed { details: Option<String> },

    /// `setBandLevel` failed
    SetLevelFailed { details: Option<String> },
}

impl EqualizerError {
    pub fn invalid_args(reason: &str) -> Self {
        EqualizerError::InvalidArgs {
            reason: reason.to_string(),
        }
    }
}

impl ErrorCode for EqualizerError {
    fn code(&self) -> &'static str {
        match self {
            EqualizerError::InvalidArgs { .. } => EqualizerErrorCodes::INVALID_ARGS,
            EqualizerError::InitFailed { .. } => EqualizerErrorCodes::INIT_ERROR,
            EqualizerError::EnableFailed { .. } => EqualizerErrorCodes::ENABLE_ERROR,
            EqualizerError::GetEnabledFailed { .. } => EqualizerErrorCodes::GET_ENABLED_ERROR,
            EqualizerError::RangeUnavailable | EqualizerError::RangeFailed { .. } => {
                EqualizerErrorCodes::RANGE_ERROR
            }
            EqualizerError::FreqFailed { .. } => EqualizerErrorCodes::FREQ_ERROR,
            EqualizerError::LevelFailed { .. } => EqualizerErrorCodes::LEVEL_ERROR,
            EqualizerError::SetLevelFailed { .. } => EqualizerErrorCodes::SET_LEVEL_ERROR,
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            EqualizerError::InvalidArgs { reason } => Some(reason.clone()),
            // The host formats a null message as the literal "null"
            EqualizerError::InitFailed { details } => Some(format!(
                "Failed to init equalizer: {}",
                details.as_deref().unwrap_or("null")
            )),
            EqualizerError::RangeUnavailable => Some("Range unavailable".to_string()),
            EqualizerError::EnableFailed { details }
            | EqualizerError::GetEnabledFailed { details }
            | EqualizerError::RangeFailed { details }
            | EqualizerError::FreqFailed { details }
            | EqualizerError::LevelFailed { details }
            | EqualizerError::SetLevelFailed { details } => details.clone(),
        }
    }
}

impl fmt::Display for EqualizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EqualizerError {}: {}",
            self.code(),
            self.message().as_deref().unwrap_or("null")
        )
    }
}

impl std::error::Error for EqualizerError {}

/// Builders mapping a native failure onto the reply for a given operation
impl EqualizerError {
    pub fn init(err: NativeError) -> Self {
        EqualizerError::InitFailed {
            details: err.message,
        }
    }

    pub fn enable(err: NativeError) -> Self {
        EqualizerError::EnableFailed {
            details: err.message,
        }
    }

    pub fn get_enabled(err: NativeError) -> Self {
        EqualizerError::GetEnabledFailed {
            details: err.message,
        }
    }

    pub fn range(err: NativeError) -> Self {
        EqualizerError::RangeFailed {
            details: err.message,
        }
    }

    pub fn freq(err: NativeError) -> Self {
        EqualizerError::FreqFailed {
            details: err.message,
        }
    }

    pub fn level(err: NativeError) -> Self {
        EqualizerError::LevelFailed {
            details: err.message,
        }
    }

    pub fn set_level(err: NativeError) -> Self {
        EqualizerError::SetLevelFailed {
            details: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EqualizerError::invalid_args("Session ID required").code(),
            "INVALID_ARGS"
        );
        assert_eq!(
            EqualizerError::InitFailed { details: None }.code(),
            "INIT_ERROR"
        );
        assert_eq!(
            EqualizerError::EnableFailed { details: None }.code(),
            "ENABLE_ERROR"
        );
        assert_eq!(
            EqualizerError::GetEnabledFailed { details: None }.code(),
            "GET_ENABLED_ERROR"
        );
        assert_eq!(EqualizerError::RangeUnavailable.code(), "RANGE_ERROR");
        assert_eq!(
            EqualizerError::RangeFailed { details: None }.code(),
            "RANGE_ERROR"
        );
        assert_eq!(
            EqualizerError::FreqFailed { details: None }.code(),
            "FREQ_ERROR"
        );
        assert_eq!(
            EqualizerError::LevelFailed { details: None }.code(),
            "LEVEL_ERROR"
        );
        assert_eq!(
            EqualizerError::SetLevelFailed { details: None }.code(),
            "SET_LEVEL_ERROR"
        );
    }

    #[test]
    fn test_init_message_wraps_native_message() {
        let err = EqualizerError::init(NativeError::new("Cannot initialize effect engine"));
        assert_eq!(
            err.message().as_deref(),
            Some("Failed to init equalizer: Cannot initialize effect engine")
        );
    }

    #[test]
    fn test_init_message_with_null_native_message() {
        let err = EqualizerError::InitFailed { details: None };
        assert_eq!(
            err.message().as_deref(),
            Some("Failed to init equalizer: null")
        );
    }

    #[test]
    fn test_native_message_passes_through_verbatim() {
        let err = EqualizerError::set_level(NativeError::with_kind(
            "java.lang.IllegalArgumentException",
            Some("bad parameter value".to_string()),
        ));
        assert_eq!(err.message().as_deref(), Some("bad parameter value"));

        let err = EqualizerError::level(NativeError::with_kind("java.lang.RuntimeException", None));
        assert_eq!(err.message(), None);
    }

    #[test]
    fn test_range_unavailable_message() {
        assert_eq!(
            EqualizerError::RangeUnavailable.message().as_deref(),
            Some("Range unavailable")
        );
    }

    #[test]
    fn test_error_code_trait() {
        let err: &dyn ErrorCode = &EqualizerError::RangeUnavailable;
        assert_eq!(err.code(), EqualizerErrorCodes::RANGE_ERROR);
    }

    #[test]
    fn test_display() {
        let err = EqualizerError::invalid_args("Band index required");
        assert_eq!(
            err.to_string(),
            "EqualizerError INVALID_ARGS: Band index required"
        );
    }
}
