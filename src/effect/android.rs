//! `android.media.audiofx.Equalizer` over JNI.
//!
//! The Java VM is registered from `JNI_OnLoad`. A library opened with a bare
//! `dlopen` never gets that call, so every effect operation then fails with
//! a [`NativeError`] instead of reaching the VM. Each call attaches the
//! current thread, invokes one Java method and converts any pending Java
//! exception into a [`NativeError`] after clearing it.

use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JObject, JShortArray, JString, JValue};
use jni::{JNIEnv, JavaVM};
use once_cell::sync::OnceCell;

use crate::error::NativeError;

use super::{EffectFactory, EqualizerEffect};

const EQUALIZER_CLASS: &str = "android/media/audiofx/Equalizer";

static JAVA_VM: OnceCell<JavaVM> = OnceCell::new();

/// Record the VM handed to `JNI_OnLoad`. Later registrations are ignored.
pub fn register_java_vm(vm: JavaVM) {
    if JAVA_VM.set(vm).is_err() {
        log::debug!("[AndroidEqualizer] JavaVM already registered");
    }
}

fn java_vm() -> Result<&'static JavaVM, NativeError> {
    JAVA_VM.get().ok_or_else(NativeError::vm_unavailable)
}

/// Clear the pending Java exception (if any) and describe it.
fn take_exception(env: &mut JNIEnv<'_>, err: JniError) -> NativeError {
    if !matches!(err, JniError::JavaException) {
        return NativeError::new(err.to_string());
    }

    let throwable = match env.exception_occurred() {
        Ok(throwable) => throwable,
        Err(lookup_err) => return NativeError::new(lookup_err.to_string()),
    };
    let _ = env.exception_clear();
    if throwable.is_null() {
        return NativeError::new(err.to_string());
    }

    let kind = env
        .get_object_class(&throwable)
        .ok()
        .and_then(|class| call_string_method(env, &class, "getName"));
    let message = call_string_method(env, &throwable, "getMessage");

    NativeError { kind, message }
}

/// Invoke a `()Ljava/lang/String;` method; `None` for null or on failure.
fn call_string_method(env: &mut JNIEnv<'_>, target: &JObject<'_>, name: &str) -> Option<String> {
    let value = match env
        .call_method(target, name, "()Ljava/lang/String;", &[])
        .and_then(|value| value.l())
    {
        Ok(value) => value,
        Err(_) => {
            let _ = env.exception_clear();
            return None;
        }
    };
    if value.is_null() {
        return None;
    }
    let text = JString::from(value);
    env.get_string(&text).ok().map(String::from)
}

/// Creates platform equalizers.
#[derive(Default)]
pub struct AndroidEffectFactory {
    _unit: (),
}

impl AndroidEffectFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EffectFactory for AndroidEffectFactory {
    fn create(
        &self,
        priority: i32,
        audio_session: i32,
    ) -> Result<Box<dyn EqualizerEffect>, NativeError> {
        let vm = java_vm()?;
        let effect = {
            let mut env = vm
                .attach_current_thread()
                .map_err(|err| NativeError::new(err.to_string()))?;
            let local = env
                .new_object(
                    EQUALIZER_CLASS,
                    "(II)V",
                    &[JValue::Int(priority), JValue::Int(audio_session)],
                )
                .map_err(|err| take_exception(&mut *env, err))?;
            env.new_global_ref(&local)
                .map_err(|err| take_exception(&mut *env, err))?
        };

        log::debug!(
            "[AndroidEqualizer] Created effect for session {} (priority {})",
            audio_session,
            priority
        );

        Ok(Box::new(AndroidEqualizer {
            vm,
            effect: Some(effect),
        }))
    }
}

/// Global reference to a live `Equalizer` instance.
struct AndroidEqualizer {
    vm: &'static JavaVM,
    effect: Option<GlobalRef>,
}

impl AndroidEqualizer {
    fn with_effect<T>(
        &self,
        op: impl FnOnce(&mut JNIEnv<'_>, &GlobalRef) -> jni::errors::Result<T>,
    ) -> Result<T, NativeError> {
        let effect = self.effect.as_ref().ok_or_else(NativeError::released)?;
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|err| NativeError::new(err.to_string()))?;
        op(&mut *env, effect).map_err(|err| take_exception(&mut *env, err))
    }
}

impl EqualizerEffect for AndroidEqualizer {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), NativeError> {
        // The returned status code is not surfaced to Dart
        self.with_effect(|env, effect| {
            env.call_method(effect, "setEnabled", "(Z)I", &[JValue::Bool(u8::from(enabled))])?
                .i()
                .map(|_| ())
        })
    }

    fn enabled(&self) -> Result<bool, NativeError> {
        self.with_effect(|env, effect| env.call_method(effect, "getEnabled", "()Z", &[])?.z())
    }

    fn band_level_range(&self) -> Result<Option<(i16, i16)>, NativeError> {
        self.with_effect(|env, effect| {
            let value = env
                .call_method(effect, "getBandLevelRange", "()[S", &[])?
                .l()?;
            if value.is_null() {
                return Ok(None);
            }
            let array = JShortArray::from(value);
            if env.get_array_length(&array)? < 2 {
                return Ok(None);
            }
            let mut range = [0i16; 2];
            env.get_short_array_region(&array, 0, &mut range)?;
            Ok(Some((range[0], range[1])))
        })
    }

    fn number_of_bands(&self) -> Result<i16, NativeError> {
        self.with_effect(|env, effect| {
            env.call_method(effect, "getNumberOfBands", "()S", &[])?.s()
        })
    }

    fn center_freq(&self, band: i16) -> Result<i32, NativeError> {
        self.with_effect(|env, effect| {
            env.call_method(effect, "getCenterFreq", "(S)I", &[JValue::Short(band)])?
                .i()
        })
    }

    fn band_level(&self, band: i16) -> Result<i16, NativeError> {
        self.with_effect(|env, effect| {
            env.call_method(effect, "getBandLevel", "(S)S", &[JValue::Short(band)])?
                .s()
        })
    }

    fn set_band_level(&mut self, band: i16, level: i16) -> Result<(), NativeError> {
        self.with_effect(|env, effect| {
            env.call_method(
                effect,
                "setBandLevel",
                "(SS)V",
                &[JValue::Short(band), JValue::Short(level)],
            )?
            .v()
        })
    }

    fn release(&mut self) {
        if self.effect.is_none() {
            return;
        }
        if let Err(err) =
            self.with_effect(|env, effect| env.call_method(effect, "release", "()V", &[])?.v())
        {
            log::warn!("[AndroidEqualizer] release() failed: {}", err);
        }
        self.effect = None;
    }
}

impl Drop for AndroidEqualizer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_without_registered_vm_is_an_error() {
        // Test binaries are never loaded through System.loadLibrary
        let err = AndroidEffectFactory::new()
            .create(0, 1)
            .err()
            .expect("create must fail without a JavaVM");
        assert_eq!(err, NativeError::vm_unavailable());
    }
}
