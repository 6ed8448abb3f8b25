// Public API for flutter_rust_bridge integration
// This module provides FFI functions for Flutter to reach the equalizer bridge

use anyhow::{Context, Result};
use once_cell::sync::Lazy;

use crate::bridge::EqualizerBridge;
use crate::channel::MethodCall;
use crate::config::BridgeConfig;
use crate::telemetry::BridgeEvent;

mod types;

pub use types::{EqualizerReply, ReplyStatus};

// Re-export error code constants for FFI exposure
pub use crate::error::EqualizerErrorCodes;

/// Global bridge instance
///
/// Created on first use with the platform configuration and the platform
/// effect backend. Holds the single equalizer handle for the process.
static BRIDGE: Lazy<EqualizerBridge> = Lazy::new(|| {
    let config = load_platform_config();
    crate::init_logging(&config.logging);
    EqualizerBridge::with_default_backend(&config)
});

#[cfg(target_os = "android")]
fn load_platform_config() -> BridgeConfig {
    BridgeConfig::load_android()
}

#[cfg(not(target_os = "android"))]
fn load_platform_config() -> BridgeConfig {
    BridgeConfig::load()
}

/// Access the process-wide bridge (also used by the JNI entry points)
pub fn bridge() -> &'static EqualizerBridge {
    &BRIDGE
}

/// Get the version of the equalizer bridge
#[flutter_rust_bridge::frb(sync)]
pub fn get_version() -> Result<String> {
    Ok(env!("CARGO_PKG_VERSION").to_string())
}

/// Channel name the Dart side uses for equalizer calls
#[flutter_rust_bridge::frb(sync)]
pub fn equalizer_channel_name() -> String {
    BRIDGE.channel_name().to_string()
}

/// Perform one equalizer method call
///
/// # Arguments
/// * `method` - Method name, e.g. `setBandLevel`
/// * `arguments_json` - JSON object of named arguments (may be empty)
///
/// # Returns
/// Exactly one reply: success with a JSON value, an error code with the
/// native message, or not-implemented for unknown method names.
///
/// # Usage
/// ```dart
/// final reply = handleEqualizerCall(method: 'setBandLevel', argumentsJson: '{"band":0,"level":300}');
/// if (reply.status == ReplyStatus.error) print('${reply.code}: ${reply.message}');
/// ```
#[flutter_rust_bridge::frb(sync)]
pub fn handle_equalizer_call(method: String, arguments_json: String) -> EqualizerReply {
    let call = MethodCall::from_json_arguments(method, &arguments_json);
    BRIDGE.handle(&call).into()
}

/// Release the equalizer as part of host teardown
///
/// Safe to call without a live equalizer.
#[flutter_rust_bridge::frb(sync)]
pub fn release_equalizer() {
    BRIDGE.on_destroy();
}

/// Get EqualizerErrorCodes as a structured object with all error code constants
#[flutter_rust_bridge::frb(sync)]
pub fn get_equalizer_error_codes() -> EqualizerErrorCodes {
    EqualizerErrorCodes {}
}

/// Recent bridge activity as JSON
#[flutter_rust_bridge::frb(sync)]
pub fn equalizer_diagnostics_json() -> Result<String> {
    serde_json::to_string(&BRIDGE.telemetry_snapshot())
        .context("Failed to serialize equalizer diagnostics")
}

/// Stream of bridge events (method calls and effect lifecycle)
#[flutter_rust_bridge::frb(ignore)]
pub async fn equalizer_events_stream() -> impl futures::Stream<Item = BridgeEvent> {
    BRIDGE.telemetry().stream()
}

#[cfg(test)]
mod tests;
