// Failures raised by the platform equalizer effect

use std::fmt;

/// A failure reported by the native effect layer.
///
/// On Android this carries the pending Java exception: its class name and
/// `getMessage()` result, which may be null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    /// Fully-qualified exception class, when known
    pub kind: Option<String>,
    /// Exception message as reported by the platform
    pub message: Option<String>,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: Some(message.into()),
        }
    }

    pub fn with_kind(kind: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            message,
        }
    }

    /// `IllegalStateException` analog raised when touching a released effect
    pub fn released() -> Self {
        Self::with_kind(
            "java.lang.IllegalStateException",
            Some("Unable to perform operation on released equalizer".to_string()),
        )
    }
}

impl NativeError {
    /// The library was loaded without `JNI_OnLoad`, so no VM is reachable
    pub fn vm_unavailable() -> Self {
        Self::new("JavaVM unavailable: JNI_OnLoad not called")
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.message) {
            (Some(kind), Some(message)) => write!(f, "{}: {}", kind, message),
            (Some(kind), None) => write!(f, "{}", kind),
            (None, Some(message)) => write!(f, "{}", message),
            (None, None) => write!(f, "unknown native failure"),
        }
    }
}

impl std::error::Error for NativeError {}
