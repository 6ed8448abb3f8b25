// EqualizerManager: owner of the single native equalizer handle
//
// Single Responsibility: effect lifecycle (create/replace/release) and the
// per-operation mapping of native failures onto error replies

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::effect::{EffectFactory, EqualizerEffect};
use crate::error::EqualizerError;
use crate::telemetry::{LifecyclePhase, TelemetryCollector};

/// The live effect plus the session it is bound to
struct ActiveEffect {
    audio_session: i32,
    effect: Box<dyn EqualizerEffect>,
}

/// Manages the optional, exclusively-owned native equalizer
///
/// At most one effect is alive at a time. It is created by [`init`],
/// released before being replaced by a later [`init`], and released by
/// [`release`], [`teardown`] or when the manager is dropped. A released
/// effect is never kept around.
///
/// Without an effect, reads answer with defaults and writes are no-ops.
///
/// # Example
/// ```ignore
/// let manager = EqualizerManager::new(Box::new(StubEffectFactory::default()), 0, telemetry);
/// manager.init(1)?;
/// manager.set_band_level(0, 300)?;
/// assert_eq!(manager.band_level(0)?, 300);
/// manager.release();
/// ```
///
/// [`init`]: EqualizerManager::init
/// [`release`]: EqualizerManager::release
/// [`teardown`]: EqualizerManager::teardown
pub struct EqualizerManager {
    handle: Mutex<Option<ActiveEffect>>,
    factory: Box<dyn EffectFactory>,
    priority: i32,
    telemetry: Arc<TelemetryCollector>,
}

impl EqualizerManager {
    /// Create a manager with no effect
    ///
    /// # Arguments
    /// * `factory` - Constructs native effects
    /// * `priority` - Priority passed to every effect constructor
    /// * `telemetry` - Receives lifecycle events
    pub fn new(
        factory: Box<dyn EffectFactory>,
        priority: i32,
        telemetry: Arc<TelemetryCollector>,
    ) -> Self {
        Self {
            handle: Mutex::new(None),
            factory,
            priority,
            telemetry,
        }
    }

    /// Bind a new effect to `audio_session`
    ///
    /// Any previous effect is released first. If construction then fails the
    /// manager holds no effect.
    ///
    /// # Errors
    /// - `INIT_ERROR` when the platform refuses to create the effect
    pub fn init(&self, audio_session: i32) -> Result<(), EqualizerError> {
        let mut guard = self.lock_handle();

        if let Some(previous) = guard.take() {
            debug!(
                "[EqualizerManager] Replacing effect for session {}",
                previous.audio_session
            );
            self.release_effect(previous);
        }

        let effect = self
            .factory
            .create(self.priority, audio_session)
            .map_err(EqualizerError::init)?;

        *guard = Some(ActiveEffect {
            audio_session,
            effect,
        });
        info!(
            "[EqualizerManager] Equalizer bound to audio session {}",
            audio_session
        );
        self.telemetry
            .record_lifecycle(LifecyclePhase::EffectCreated, Some(audio_session));
        Ok(())
    }

    /// Release and clear the effect. No-op without one.
    pub fn release(&self) {
        if let Some(active) = self.lock_handle().take() {
            self.release_effect(active);
        }
    }

    /// Teardown of the hosting activity: release unconditionally
    pub fn teardown(&self) {
        self.release();
        self.telemetry.record_lifecycle(LifecyclePhase::Teardown, None);
    }

    /// Enable or disable the effect. No-op without one.
    ///
    /// # Errors
    /// - `ENABLE_ERROR` when the platform call fails
    pub fn set_enabled(&self, enabled: bool) -> Result<(), EqualizerError> {
        let mut guard = self.lock_handle();
        match guard.as_mut() {
            Some(active) => active
                .effect
                .set_enabled(enabled)
                .map_err(EqualizerError::enable),
            None => Ok(()),
        }
    }

    /// Whether the effect is enabled; `false` without one
    ///
    /// # Errors
    /// - `GET_ENABLED_ERROR` when the platform call fails
    pub fn is_enabled(&self) -> Result<bool, EqualizerError> {
        let guard = self.lock_handle();
        match guard.as_ref() {
            Some(active) => active.effect.enabled().map_err(EqualizerError::get_enabled),
            None => Ok(false),
        }
    }

    /// `(min, max)` band level in millibels
    ///
    /// # Errors
    /// - `RANGE_ERROR` without an effect, when the platform returns null,
    ///   or when the platform call fails
    pub fn band_level_range(&self) -> Result<(i16, i16), EqualizerError> {
        let guard = self.lock_handle();
        let active = guard.as_ref().ok_or(EqualizerError::RangeUnavailable)?;
        active
            .effect
            .band_level_range()
            .map_err(EqualizerError::range)?
            .ok_or(EqualizerError::RangeUnavailable)
    }

    /// Center frequency of every band in milliHertz; empty without an effect
    ///
    /// # Errors
    /// - `FREQ_ERROR` when the band count or any frequency query fails
    pub fn center_band_freqs(&self) -> Result<Vec<i32>, EqualizerError> {
        let guard = self.lock_handle();
        let Some(active) = guard.as_ref() else {
            return Ok(Vec::new());
        };

        let bands = active
            .effect
            .number_of_bands()
            .map_err(EqualizerError::freq)?;
        (0..bands)
            .map(|band| active.effect.center_freq(band).map_err(EqualizerError::freq))
            .collect()
    }

    /// Level of `band` in millibels; `0` without an effect
    ///
    /// # Errors
    /// - `LEVEL_ERROR` when the platform call fails
    pub fn band_level(&self, band: i16) -> Result<i16, EqualizerError> {
        let guard = self.lock_handle();
        match guard.as_ref() {
            Some(active) => active.effect.band_level(band).map_err(EqualizerError::level),
            None => Ok(0),
        }
    }

    /// Set the level of `band`. No-op without an effect.
    ///
    /// # Errors
    /// - `SET_LEVEL_ERROR` when the platform call fails
    pub fn set_band_level(&self, band: i16, level: i16) -> Result<(), EqualizerError> {
        let mut guard = self.lock_handle();
        match guard.as_mut() {
            Some(active) => active
                .effect
                .set_band_level(band, level)
                .map_err(EqualizerError::set_level),
            None => Ok(()),
        }
    }

    /// Whether an effect is currently held
    pub fn has_handle(&self) -> bool {
        self.lock_handle().is_some()
    }

    /// Audio session of the current effect
    pub fn audio_session(&self) -> Option<i32> {
        self.lock_handle()
            .as_ref()
            .map(|active| active.audio_session)
    }

    // ========================================================================
    // PRIVATE HELPER METHODS
    // ========================================================================

    /// Acquire the handle lock, clearing poison left by a panicked caller
    ///
    /// The slot only ever holds `None` or a whole `ActiveEffect`, so the
    /// value behind a poisoned lock is still usable.
    fn lock_handle(&self) -> MutexGuard<'_, Option<ActiveEffect>> {
        self.handle.lock().unwrap_or_else(|poisoned| {
            warn!("[EqualizerManager] Recovering handle lock after a panic");
            self.handle.clear_poison();
            poisoned.into_inner()
        })
    }

    fn release_effect(&self, mut active: ActiveEffect) {
        active.effect.release();
        info!(
            "[EqualizerManager] Released equalizer for audio session {}",
            active.audio_session
        );
        self.telemetry
            .record_lifecycle(LifecyclePhase::EffectReleased, Some(active.audio_session));
    }
}

impl Drop for EqualizerManager {
    fn drop(&mut self) {
        let slot = self.handle.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut active) = slot.take() {
            active.effect.release();
        }
    }
}
