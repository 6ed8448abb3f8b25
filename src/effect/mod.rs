//! Native equalizer seam.
//!
//! [`EqualizerEffect`] mirrors the platform effect object one call at a time;
//! [`EffectFactory`] constructs one bound to an audio session. The Android
//! backend drives `android.media.audiofx.Equalizer` over JNI, the stub
//! backend is an in-memory stand-in for desktop tooling and tests.

use crate::error::NativeError;

/// A live native equalizer bound to one audio session.
///
/// Band indices and levels are 16-bit like the platform API. Every fallible
/// call surfaces the platform failure as a [`NativeError`].
pub trait EqualizerEffect: Send {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), NativeError>;
    fn enabled(&self) -> Result<bool, NativeError>;
    /// `(min, max)` in millibels; `None` when the platform returns null
    fn band_level_range(&self) -> Result<Option<(i16, i16)>, NativeError>;
    fn number_of_bands(&self) -> Result<i16, NativeError>;
    /// Center frequency of `band` in milliHertz
    fn center_freq(&self, band: i16) -> Result<i32, NativeError>;
    fn band_level(&self, band: i16) -> Result<i16, NativeError>;
    fn set_band_level(&mut self, band: i16, level: i16) -> Result<(), NativeError>;
    /// Free the native resources. Must be called exactly once.
    fn release(&mut self);
}

/// Constructs native effects.
pub trait EffectFactory: Send + Sync {
    fn create(
        &self,
        priority: i32,
        audio_session: i32,
    ) -> Result<Box<dyn EqualizerEffect>, NativeError>;
}

#[cfg(target_os = "android")]
mod android;
#[cfg(target_os = "android")]
pub use android::{register_java_vm, AndroidEffectFactory};

pub mod stub;
pub use stub::{StubControl, StubEffectFactory, StubEvent, StubOperation, StubProfile};

cfg_if::cfg_if! {
    if #[cfg(target_os = "android")] {
        /// Factory for the platform the crate is compiled for.
        ///
        /// The stub profile only applies off-device.
        pub fn default_factory(_profile: &StubProfile) -> Box<dyn EffectFactory> {
            Box::new(AndroidEffectFactory::new())
        }
    } else {
        /// Factory for the platform the crate is compiled for.
        ///
        /// Off-device there is no platform effect, so the stub stands in.
        pub fn default_factory(profile: &StubProfile) -> Box<dyn EffectFactory> {
            Box::new(StubEffectFactory::new(profile.clone()))
        }
    }
}
