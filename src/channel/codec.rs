//! Method call / reply envelope and its JSON encoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EqualizerError, ErrorCode};

/// An incoming call: method name plus argument mapping.
///
/// Arguments are kept as a raw JSON value; Dart sends `null` for calls
/// without arguments, which reads the same as an empty map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Build a call from the raw strings handed over by the platform shim.
    ///
    /// Unparseable argument JSON is treated as no arguments, so required
    /// arguments then fail validation instead of crashing the caller.
    pub fn from_json_arguments(method: impl Into<String>, arguments_json: &str) -> Self {
        let method = method.into();
        let arguments = if arguments_json.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(arguments_json).unwrap_or_else(|err| {
                log::warn!(
                    "[Channel] Ignoring malformed arguments for {}: {}",
                    method,
                    err
                );
                Value::Null
            })
        };
        Self { method, arguments }
    }

    /// Integer argument, or `None` when absent, null, non-integral or
    /// outside the 32-bit range.
    pub fn argument_i32(&self, key: &str) -> Option<i32> {
        self.arguments
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|value| i32::try_from(value).ok())
    }

    /// Boolean argument, or `None` when absent, null or not a boolean.
    pub fn argument_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(Value::as_bool)
    }
}

/// Exactly one reply is produced per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResult {
    Success {
        value: Value,
    },
    Error {
        code: String,
        message: Option<String>,
        details: Value,
    },
    NotImplemented,
}

impl MethodResult {
    pub fn success(value: impl Into<Value>) -> Self {
        MethodResult::Success {
            value: value.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResult::Success { .. })
    }

    /// Error code for error replies
    pub fn error_code(&self) -> Option<&str> {
        match self {
            MethodResult::Error { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Encode as the JSON envelope understood by the platform shim
    pub fn to_json(&self) -> String {
        // Serializing a tree of `Value`s and strings cannot fail
        serde_json::to_string(self).unwrap_or_else(|err| {
            log::error!("[Channel] Failed to encode reply: {}", err);
            r#"{"status":"notImplemented"}"#.to_string()
        })
    }
}

impl From<EqualizerError> for MethodResult {
    fn from(err: EqualizerError) -> Self {
        MethodResult::Error {
            code: err.code().to_string(),
            message: err.message(),
            details: Value::Null,
        }
    }
}
