//! EqualizerBridge: method-call dispatcher for the equalizer channel.
//!
//! Each call is validated, forwarded as a single operation to the
//! [`EqualizerManager`], and answered with exactly one [`MethodResult`].
//! Missing required arguments are rejected before the native layer is
//! touched; native failures become error replies and never escape.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};

use crate::channel::{keys, EqualizerMethod, MethodCall, MethodResult};
use crate::config::BridgeConfig;
use crate::effect::{self, EffectFactory};
use crate::error::{log_equalizer_error, EqualizerError};
use crate::managers::EqualizerManager;
use crate::telemetry::{TelemetryCollector, TelemetrySnapshot};

/// Narrow a wire integer to the platform's 16-bit band/level type.
///
/// Two's-complement truncation, the conversion the platform call applies.
fn to_platform_short(value: i32) -> i16 {
    value as i16
}

/// Dispatcher bound to one channel and one effect factory.
pub struct EqualizerBridge {
    channel: String,
    manager: EqualizerManager,
    telemetry: Arc<TelemetryCollector>,
}

impl EqualizerBridge {
    pub fn new(config: &BridgeConfig, factory: Box<dyn EffectFactory>) -> Self {
        let telemetry = Arc::new(TelemetryCollector::new(
            config.telemetry.broadcast_buffer,
            config.telemetry.history_capacity,
        ));
        Self {
            channel: config.channel.name.clone(),
            manager: EqualizerManager::new(factory, config.effect.priority, Arc::clone(&telemetry)),
            telemetry,
        }
    }

    /// Bridge using the platform effect on Android and the stub elsewhere.
    pub fn with_default_backend(config: &BridgeConfig) -> Self {
        Self::new(config, effect::default_factory(&config.stub))
    }

    pub fn channel_name(&self) -> &str {
        &self.channel
    }

    pub fn telemetry(&self) -> &Arc<TelemetryCollector> {
        &self.telemetry
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    pub fn has_handle(&self) -> bool {
        self.manager.has_handle()
    }

    /// Answer one method call.
    pub fn handle(&self, call: &MethodCall) -> MethodResult {
        let started = Instant::now();
        let span = tracing::debug_span!("equalizer_call", method = %call.method);
        let _entered = span.enter();

        let result = match EqualizerMethod::from_name(&call.method) {
            Some(method) => match self.dispatch(method, call) {
                Ok(value) => MethodResult::Success { value },
                Err(err) => {
                    log_equalizer_error(&err, &call.method);
                    err.into()
                }
            },
            None => {
                tracing::debug!("no handler for method {:?}", call.method);
                MethodResult::NotImplemented
            }
        };

        self.telemetry
            .record_call(&call.method, &result, started.elapsed());
        result
    }

    /// Answer a call given as raw strings, replying with the JSON envelope.
    pub fn handle_json(&self, method: &str, arguments_json: &str) -> String {
        self.handle(&MethodCall::from_json_arguments(method, arguments_json))
            .to_json()
    }

    /// Teardown hook of the hosting activity.
    pub fn on_destroy(&self) {
        tracing::info!("Equalizer bridge teardown on channel {}", self.channel);
        self.manager.teardown();
    }

    fn dispatch(&self, method: EqualizerMethod, call: &MethodCall) -> Result<Value, EqualizerError> {
        match method {
            EqualizerMethod::Init => {
                let audio_session = call
                    .argument_i32(keys::SESSION_ID)
                    .ok_or_else(|| EqualizerError::invalid_args("Session ID required"))?;
                self.manager.init(audio_session)?;
                Ok(Value::Bool(true))
            }
            EqualizerMethod::Release => {
                self.manager.release();
                Ok(Value::Bool(true))
            }
            EqualizerMethod::Enable => {
                let enabled = call.argument_bool(keys::ENABLE).unwrap_or(false);
                self.manager.set_enabled(enabled)?;
                Ok(Value::Bool(true))
            }
            EqualizerMethod::IsEnabled => Ok(Value::Bool(self.manager.is_enabled()?)),
            EqualizerMethod::GetBandLevelRange => {
                let (min, max) = self.manager.band_level_range()?;
                Ok(json!([i32::from(min), i32::from(max)]))
            }
            EqualizerMethod::GetCenterBandFreqs => Ok(json!(self.manager.center_band_freqs()?)),
            EqualizerMethod::GetBandLevel => {
                let band = call
                    .argument_i32(keys::BAND)
                    .ok_or_else(|| EqualizerError::invalid_args("Band index required"))?;
                let level = self.manager.band_level(to_platform_short(band))?;
                Ok(json!(i32::from(level)))
            }
            EqualizerMethod::SetBandLevel => {
                let (Some(band), Some(level)) = (
                    call.argument_i32(keys::BAND),
                    call.argument_i32(keys::LEVEL),
                ) else {
                    return Err(EqualizerError::invalid_args("Band and Level required"));
                };
                self.manager
                    .set_band_level(to_platform_short(band), to_platform_short(level))?;
                Ok(Value::Bool(true))
            }
        }
    }
}
