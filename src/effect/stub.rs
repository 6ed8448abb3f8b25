//! In-memory equalizer used off-device.
//!
//! Behaves as an identity store: a level written to a band reads back
//! unchanged. Failures can be injected per operation, and every create and
//! release is recorded so tests can check handle ownership.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::NativeError;

use super::{EffectFactory, EqualizerEffect};

/// Hardware profile the stub pretends to be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StubProfile {
    /// One entry per band, milliHertz
    pub center_freqs_mhz: Vec<i32>,
    pub min_level_mb: i16,
    pub max_level_mb: i16,
}

impl Default for StubProfile {
    /// Five-band layout reported by stock Android devices
    fn default() -> Self {
        Self {
            center_freqs_mhz: vec![60_000, 230_000, 910_000, 3_600_000, 14_000_000],
            min_level_mb: -1500,
            max_level_mb: 1500,
        }
    }
}

/// Native calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubOperation {
    Create,
    SetEnabled,
    GetEnabled,
    BandLevelRange,
    NumberOfBands,
    CenterFreq,
    BandLevel,
    SetBandLevel,
}

/// Lifecycle record kept by the stub ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubEvent {
    Created { audio_session: i32 },
    Released { audio_session: i32 },
}

#[derive(Default)]
struct StubShared {
    events: Vec<StubEvent>,
    live: usize,
    native_calls: usize,
    failures: HashMap<StubOperation, Option<String>>,
    panics: HashSet<StubOperation>,
    null_range: bool,
}

fn lock_shared(shared: &Mutex<StubShared>) -> MutexGuard<'_, StubShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Panic if `operation` was armed with [`StubControl::panic_once`].
fn panic_if_armed(
    mut shared: MutexGuard<'_, StubShared>,
    operation: StubOperation,
) -> MutexGuard<'_, StubShared> {
    if shared.panics.remove(&operation) {
        drop(shared);
        panic!("stub equalizer crashed in {:?}", operation);
    }
    shared
}

/// Test-side handle onto the state shared by a factory and its effects.
#[derive(Clone)]
pub struct StubControl {
    shared: Arc<Mutex<StubShared>>,
}

impl StubControl {
    /// Make `operation` throw a `RuntimeException` carrying `message`
    pub fn fail(&self, operation: StubOperation, message: Option<&str>) {
        lock_shared(&self.shared)
            .failures
            .insert(operation, message.map(str::to_string));
    }

    /// Make the next `operation` panic, as a crashing native call would
    pub fn panic_once(&self, operation: StubOperation) {
        lock_shared(&self.shared).panics.insert(operation);
    }

    pub fn clear_failures(&self) {
        let mut shared = lock_shared(&self.shared);
        shared.failures.clear();
        shared.panics.clear();
    }

    /// Make `getBandLevelRange` return null
    pub fn set_null_range(&self, null_range: bool) {
        lock_shared(&self.shared).null_range = null_range;
    }

    pub fn events(&self) -> Vec<StubEvent> {
        lock_shared(&self.shared).events.clone()
    }

    /// Effects created and not yet released
    pub fn live_handles(&self) -> usize {
        lock_shared(&self.shared).live
    }

    /// Calls made against effects, including ones that failed
    pub fn native_calls(&self) -> usize {
        lock_shared(&self.shared).native_calls
    }
}

/// Factory producing [`StubEqualizer`]s.
pub struct StubEffectFactory {
    profile: StubProfile,
    shared: Arc<Mutex<StubShared>>,
}

impl StubEffectFactory {
    pub fn new(profile: StubProfile) -> Self {
        Self {
            profile,
            shared: Arc::new(Mutex::new(StubShared::default())),
        }
    }

    pub fn control(&self) -> StubControl {
        StubControl {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for StubEffectFactory {
    fn default() -> Self {
        Self::new(StubProfile::default())
    }
}

impl EffectFactory for StubEffectFactory {
    fn create(
        &self,
        _priority: i32,
        audio_session: i32,
    ) -> Result<Box<dyn EqualizerEffect>, NativeError> {
        let mut shared = panic_if_armed(lock_shared(&self.shared), StubOperation::Create);
        if let Some(message) = shared.failures.get(&StubOperation::Create) {
            return Err(NativeError::with_kind(
                "java.lang.RuntimeException",
                message.clone(),
            ));
        }
        shared.events.push(StubEvent::Created { audio_session });
        shared.live += 1;

        Ok(Box::new(StubEqualizer {
            audio_session,
            enabled: false,
            levels: vec![0; self.profile.center_freqs_mhz.len()],
            profile: self.profile.clone(),
            released: false,
            shared: Arc::clone(&self.shared),
        }))
    }
}

/// In-memory equalizer instance.
pub struct StubEqualizer {
    audio_session: i32,
    enabled: bool,
    levels: Vec<i16>,
    profile: StubProfile,
    released: bool,
    shared: Arc<Mutex<StubShared>>,
}

impl StubEqualizer {
    fn check(&self, operation: StubOperation) -> Result<(), NativeError> {
        let mut shared = lock_shared(&self.shared);
        shared.native_calls += 1;
        let shared = panic_if_armed(shared, operation);
        if self.released {
            return Err(NativeError::released());
        }
        match shared.failures.get(&operation) {
            Some(message) => Err(NativeError::with_kind(
                "java.lang.RuntimeException",
                message.clone(),
            )),
            None => Ok(()),
        }
    }

    fn band_index(&self, band: i16) -> Result<usize, NativeError> {
        usize::try_from(band)
            .ok()
            .filter(|index| *index < self.levels.len())
            .ok_or_else(|| {
                NativeError::with_kind(
                    "java.lang.IllegalArgumentException",
                    Some("AudioEffect: bad parameter value".to_string()),
                )
            })
    }
}

impl EqualizerEffect for StubEqualizer {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), NativeError> {
        self.check(StubOperation::SetEnabled)?;
        self.enabled = enabled;
        Ok(())
    }

    fn enabled(&self) -> Result<bool, NativeError> {
        self.check(StubOperation::GetEnabled)?;
        Ok(self.enabled)
    }

    fn band_level_range(&self) -> Result<Option<(i16, i16)>, NativeError> {
        self.check(StubOperation::BandLevelRange)?;
        if lock_shared(&self.shared).null_range {
            return Ok(None);
        }
        Ok(Some((self.profile.min_level_mb, self.profile.max_level_mb)))
    }

    fn number_of_bands(&self) -> Result<i16, NativeError> {
        self.check(StubOperation::NumberOfBands)?;
        Ok(i16::try_from(self.levels.len()).unwrap_or(i16::MAX))
    }

    fn center_freq(&self, band: i16) -> Result<i32, NativeError> {
        self.check(StubOperation::CenterFreq)?;
        let index = self.band_index(band)?;
        Ok(self.profile.center_freqs_mhz[index])
    }

    fn band_level(&self, band: i16) -> Result<i16, NativeError> {
        self.check(StubOperation::BandLevel)?;
        let index = self.band_index(band)?;
        Ok(self.levels[index])
    }

    fn set_band_level(&mut self, band: i16, level: i16) -> Result<(), NativeError> {
        self.check(StubOperation::SetBandLevel)?;
        let index = self.band_index(band)?;
        self.levels[index] = level;
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut shared = lock_shared(&self.shared);
        shared.live = shared.live.saturating_sub(1);
        shared.events.push(StubEvent::Released {
            audio_session: self.audio_session,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_store() {
        let factory = StubEffectFactory::default();
        let mut effect = factory.create(0, 7).unwrap();

        effect.set_band_level(2, -450).unwrap();
        assert_eq!(effect.band_level(2).unwrap(), -450);
        assert_eq!(effect.band_level(0).unwrap(), 0);
    }

    #[test]
    fn test_default_profile() {
        let factory = StubEffectFactory::default();
        let effect = factory.create(0, 1).unwrap();

        assert_eq!(effect.number_of_bands().unwrap(), 5);
        assert_eq!(effect.band_level_range().unwrap(), Some((-1500, 1500)));
        assert_eq!(effect.center_freq(0).unwrap(), 60_000);
        assert!(!effect.enabled().unwrap());
    }

    #[test]
    fn test_bad_band_is_illegal_argument() {
        let factory = StubEffectFactory::default();
        let mut effect = factory.create(0, 1).unwrap();

        let err = effect.set_band_level(9, 100).unwrap_err();
        assert_eq!(
            err.kind.as_deref(),
            Some("java.lang.IllegalArgumentException")
        );
        assert!(effect.band_level(-1).is_err());
    }

    #[test]
    fn test_panic_once_is_disarmed_after_firing() {
        let factory = StubEffectFactory::default();
        let control = factory.control();
        control.panic_once(StubOperation::Create);

        let crashed = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = factory.create(0, 1);
        }));
        assert!(crashed.is_err());

        assert!(factory.create(0, 1).is_ok());
        assert_eq!(control.live_handles(), 1);
    }

    #[test]
    fn test_use_after_release_fails() {
        let factory = StubEffectFactory::default();
        let control = factory.control();
        let mut effect = factory.create(0, 3).unwrap();

        effect.release();
        effect.release();

        assert_eq!(effect.enabled().unwrap_err(), NativeError::released());
        assert_eq!(control.live_handles(), 0);
        assert_eq!(
            control.events(),
            vec![
                StubEvent::Created { audio_session: 3 },
                StubEvent::Released { audio_session: 3 },
            ]
        );
    }

    #[test]
    fn test_failure_injection() {
        let factory = StubEffectFactory::default();
        let control = factory.control();

        control.fail(StubOperation::Create, Some("no effect engine"));
        let err = factory.create(0, 1).err().unwrap();
        assert_eq!(err.message.as_deref(), Some("no effect engine"));
        assert_eq!(control.live_handles(), 0);

        control.clear_failures();
        let effect = factory.create(0, 1).unwrap();
        control.set_null_range(true);
        assert_eq!(effect.band_level_range().unwrap(), None);
    }

    #[test]
    fn test_native_calls_are_counted() {
        let factory = StubEffectFactory::default();
        let control = factory.control();
        let effect = factory.create(0, 1).unwrap();

        let _ = effect.enabled();
        let _ = effect.band_level(0);
        assert_eq!(control.native_calls(), 2);
    }
}
