//! Configuration for the equalizer bridge
//!
//! This module provides runtime configuration loading from JSON files.
//! Every section falls back to its defaults, so a partial file only needs
//! the keys it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::channel::CHANNEL_NAME;
use crate::effect::StubProfile;

/// Complete bridge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub channel: ChannelConfig,
    pub effect: EffectConfig,
    pub logging: LoggingConfig,
    pub telemetry: TelemetryConfig,
    /// Profile of the in-memory equalizer used off-device
    pub stub: StubProfile,
}

/// Method channel registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Channel name registered with the Flutter engine
    pub name: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: CHANNEL_NAME.to_string(),
        }
    }
}

/// Native effect construction parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Priority passed to the `Equalizer(priority, audioSession)` constructor
    pub priority: i32,
}

/// Logging setup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: off, error, warn, info, debug, trace
    pub level: String,
    /// Logcat tag on Android
    pub android_tag: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            android_tag: "MusicPlayerEq".to_string(),
        }
    }
}

/// Bridge event collector sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Events retained for snapshots
    pub history_capacity: usize,
    /// Broadcast channel capacity for live subscribers
    pub broadcast_buffer: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            history_capacity: 64,
            broadcast_buffer: 256,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Configuration on Android
    ///
    /// Flutter assets live inside the APK and are not reachable by path,
    /// so the bridge runs on defaults there.
    #[cfg(target_os = "android")]
    pub fn load_android() -> Self {
        log::info!("[Config] Using default configuration on Android");
        Self::default()
    }

    /// Load configuration for non-Android platforms
    #[cfg(not(target_os = "android"))]
    pub fn load() -> Self {
        Self::load_from_file("assets/equalizer_config.json")
    }
}
