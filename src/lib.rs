// Music Player Equalizer - Rust platform bridge
// Exposes the Android equalizer effect to the Flutter UI over a method channel

// Module declarations
pub mod api;
pub mod bridge;
pub mod channel;
pub mod config;
pub mod effect;
pub mod error;
pub mod managers;
pub mod telemetry;

#[cfg(target_os = "android")]
mod jni_exports;

// Re-exports for convenience
pub use api::*;
pub use bridge::EqualizerBridge;
pub use channel::{MethodCall, MethodResult, CHANNEL_NAME};

use tracing_subscriber::filter::LevelFilter;

use crate::config::LoggingConfig;

/// Initialize logging for the current platform
///
/// Logcat (tagged with `android_tag`) on Android, stderr elsewhere. `log`
/// records are forwarded into the same subscriber. Calling this more than
/// once keeps the first subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let level = config.level.parse::<LevelFilter>().unwrap_or(LevelFilter::DEBUG);

    #[cfg(target_os = "android")]
    {
        use tracing_subscriber::prelude::*;

        match tracing_android::layer(&config.android_tag) {
            Ok(layer) => {
                let _ = tracing_subscriber::registry().with(layer).with(level).try_init();
            }
            Err(err) => eprintln!("Failed to attach logcat writer: {}", err),
        }
    }

    #[cfg(not(target_os = "android"))]
    {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// JNI_OnLoad is called when the native library is loaded by Android
///
/// Registers the Java VM so the effect backend can attach threads, then
/// brings up logging and the bridge.
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(
    vm: *mut jni::sys::JavaVM,
    _reserved: *mut std::ffi::c_void,
) -> jni::sys::jint {
    // SAFETY: the VM pointer comes from the Android runtime and outlives the
    // library. No activity context is needed by android.media.audiofx.
    unsafe {
        ndk_context::initialize_android_context(vm.cast(), std::ptr::null_mut());
    }
    // SAFETY: same pointer as above, non-null when handed to JNI_OnLoad.
    match unsafe { jni::JavaVM::from_raw(vm) } {
        Ok(java_vm) => effect::register_java_vm(java_vm),
        Err(err) => log::error!("JNI_OnLoad: invalid JavaVM pointer: {}", err),
    }

    let bridge = api::bridge();
    bridge
        .telemetry()
        .record_lifecycle(telemetry::LifecyclePhase::LibraryLoaded, None);
    log::info!(
        "JNI_OnLoad: equalizer bridge ready on channel {}",
        bridge.channel_name()
    );

    jni::sys::JNI_VERSION_1_6
}
