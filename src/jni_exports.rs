//! JNI entry points for the Kotlin `MethodChannel` shim.
//!
//! The shim registers the channel, forwards `call.method` and the call
//! arguments (encoded as JSON) to `nativeHandleCall`, and decodes the JSON
//! envelope into `result.success` / `result.error` / `result.notImplemented`.
//! `nativeOnDestroy` is invoked from the activity's `onDestroy`.
//!
//! The shim lives in the app, not in this crate. It must load the library
//! with `System.loadLibrary` so that `JNI_OnLoad` runs and registers the
//! Java VM; without it every `init` replies `INIT_ERROR`.
//!
//! ```kotlin
//! package com.ezra.musicplayer.my_music_player
//!
//! object EqualizerChannel {
//!     init { System.loadLibrary("music_player_equalizer") }
//!
//!     @JvmStatic external fun nativeHandleCall(method: String, argumentsJson: String): String
//!     @JvmStatic external fun nativeOnDestroy()
//!     @JvmStatic external fun nativeChannelName(): String
//! }
//! ```

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::api;
use crate::channel::MethodResult;

fn read_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> Option<String> {
    if value.is_null() {
        return None;
    }
    env.get_string(value).ok().map(String::from)
}

fn to_jstring(env: &mut JNIEnv<'_>, value: &str) -> jstring {
    match env.new_string(value) {
        Ok(text) => text.into_raw(),
        Err(err) => {
            log::error!("[JNI] Failed to allocate reply string: {}", err);
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_com_ezra_musicplayer_my_1music_1player_EqualizerChannel_nativeHandleCall<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    method: JString<'local>,
    arguments: JString<'local>,
) -> jstring {
    let Some(method) = read_string(&mut env, &method) else {
        return to_jstring(&mut env, &MethodResult::NotImplemented.to_json());
    };
    let arguments = read_string(&mut env, &arguments).unwrap_or_default();

    let reply = api::bridge().handle_json(&method, &arguments);
    to_jstring(&mut env, &reply)
}

#[no_mangle]
pub extern "system" fn Java_com_ezra_musicplayer_my_1music_1player_EqualizerChannel_nativeOnDestroy<
    'local,
>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
) {
    api::bridge().on_destroy();
}

#[no_mangle]
pub extern "system" fn Java_com_ezra_musicplayer_my_1music_1player_EqualizerChannel_nativeChannelName<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    let name = api::bridge().channel_name().to_string();
    to_jstring(&mut env, &name)
}
