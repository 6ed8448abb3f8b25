//! Event types describing bridge activity, exposed to the CLI and to
//! flutter_rust_bridge streams.

use serde::{Deserialize, Serialize};

/// Lifecycle stages of the library and of the native effect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    LibraryLoaded,
    EffectCreated,
    EffectReleased,
    Teardown,
}

/// How a method call was answered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallOutcome {
    Success,
    Error { code: String },
    NotImplemented,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum BridgeEvent {
    MethodCall {
        method: String,
        outcome: CallOutcome,
        elapsed_us: u64,
    },
    Lifecycle {
        phase: LifecyclePhase,
        audio_session: Option<i32>,
        timestamp_ms: u64,
    },
}
