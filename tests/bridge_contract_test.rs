//! Integration tests for the equalizer method channel
//!
//! These tests drive the public bridge API with the in-memory effect and
//! check the wire contract seen by the Dart caller:
//! - method names, argument keys and error codes
//! - handle ownership across init/release/teardown
//! - benign defaults without an effect
//! - the JSON envelope handed to the platform shim

use music_player_equalizer::channel::{MethodCall, MethodResult};
use music_player_equalizer::config::BridgeConfig;
use music_player_equalizer::effect::{StubControl, StubEffectFactory, StubOperation, StubProfile};
use music_player_equalizer::EqualizerBridge;
use serde_json::{json, Value};

fn bridge_with_profile(profile: StubProfile) -> (EqualizerBridge, StubControl) {
    let factory = StubEffectFactory::new(profile);
    let control = factory.control();
    (
        EqualizerBridge::new(&BridgeConfig::default(), Box::new(factory)),
        control,
    )
}

fn bridge() -> (EqualizerBridge, StubControl) {
    bridge_with_profile(StubProfile::default())
}

fn send(bridge: &EqualizerBridge, method: &str, arguments: Value) -> Value {
    serde_json::from_str(&bridge.handle_json(method, &arguments.to_string()))
        .expect("reply envelope is JSON")
}

/// Full session as the Dart equalizer screen drives it
#[test]
fn test_equalizer_screen_session() {
    let (bridge, control) = bridge();

    assert_eq!(
        send(&bridge, "init", json!({"sessionId": 1})),
        json!({"status": "success", "value": true})
    );
    assert_eq!(
        send(&bridge, "enable", json!({"enable": true})),
        json!({"status": "success", "value": true})
    );
    assert_eq!(
        send(&bridge, "isEnabled", Value::Null)["value"],
        json!(true)
    );
    assert_eq!(
        send(&bridge, "getBandLevelRange", Value::Null)["value"],
        json!([-1500, 1500])
    );

    let freqs = send(&bridge, "getCenterBandFreqs", Value::Null);
    let bands = freqs["value"].as_array().expect("frequency list").len();
    assert_eq!(bands, 5);

    for band in 0..bands {
        let level = (band as i64) * 100 - 200;
        assert_eq!(
            send(&bridge, "setBandLevel", json!({"band": band, "level": level}))["value"],
            json!(true)
        );
        assert_eq!(
            send(&bridge, "getBandLevel", json!({"band": band}))["value"],
            json!(level)
        );
    }

    assert_eq!(
        send(&bridge, "release", Value::Null),
        json!({"status": "success", "value": true})
    );
    assert_eq!(
        send(&bridge, "isEnabled", Value::Null)["value"],
        json!(false)
    );
    assert_eq!(control.live_handles(), 0);
}

/// Switching tracks re-inits on a new audio session
#[test]
fn test_reinit_keeps_exactly_one_handle() {
    let (bridge, control) = bridge();

    for session in 1..=5 {
        send(&bridge, "init", json!({"sessionId": session}));
        assert_eq!(control.live_handles(), 1);
    }
    assert!(bridge.has_handle());

    bridge.on_destroy();
    assert_eq!(control.live_handles(), 0);
}

#[test]
fn test_missing_arguments_never_reach_native_layer() {
    let (bridge, control) = bridge();
    send(&bridge, "init", json!({"sessionId": 1}));
    let before = control.native_calls();

    let cases = [
        ("getBandLevel", json!({}), "Band index required"),
        ("setBandLevel", json!({}), "Band and Level required"),
        ("setBandLevel", json!({"band": 1}), "Band and Level required"),
        ("setBandLevel", json!({"level": 1}), "Band and Level required"),
    ];
    for (method, arguments, message) in cases {
        assert_eq!(
            send(&bridge, method, arguments),
            json!({
                "status": "error",
                "code": "INVALID_ARGS",
                "message": message,
                "details": null
            })
        );
    }
    assert_eq!(control.native_calls(), before);
}

#[test]
fn test_every_native_failure_maps_to_its_code() {
    let cases = [
        (StubOperation::SetEnabled, "enable", json!({"enable": true}), "ENABLE_ERROR"),
        (StubOperation::GetEnabled, "isEnabled", Value::Null, "GET_ENABLED_ERROR"),
        (StubOperation::BandLevelRange, "getBandLevelRange", Value::Null, "RANGE_ERROR"),
        (StubOperation::CenterFreq, "getCenterBandFreqs", Value::Null, "FREQ_ERROR"),
        (StubOperation::BandLevel, "getBandLevel", json!({"band": 0}), "LEVEL_ERROR"),
        (
            StubOperation::SetBandLevel,
            "setBandLevel",
            json!({"band": 0, "level": 0}),
            "SET_LEVEL_ERROR",
        ),
    ];

    for (operation, method, arguments, code) in cases {
        let (bridge, control) = bridge();
        send(&bridge, "init", json!({"sessionId": 1}));
        control.fail(operation, Some("native failure"));

        let reply = send(&bridge, method, arguments);
        assert_eq!(reply["status"], "error", "{method}");
        assert_eq!(reply["code"], code, "{method}");
        assert_eq!(reply["message"], "native failure", "{method}");
        assert_eq!(reply["details"], Value::Null, "{method}");

        // The bridge keeps serving after a failure
        control.clear_failures();
        assert_eq!(send(&bridge, "release", Value::Null)["status"], "success");
    }
}

#[test]
fn test_init_error_message_format() {
    let (bridge, control) = bridge();
    control.fail(StubOperation::Create, None);

    assert_eq!(
        send(&bridge, "init", json!({"sessionId": 1})),
        json!({
            "status": "error",
            "code": "INIT_ERROR",
            "message": "Failed to init equalizer: null",
            "details": null
        })
    );
}

#[test]
fn test_unrecognized_methods() {
    let (bridge, _control) = bridge();

    for method in ["", "getPresets", "usePreset", "INIT", "init "] {
        assert_eq!(
            send(&bridge, method, json!({"sessionId": 1})),
            json!({"status": "notImplemented"})
        );
    }
    assert!(!bridge.has_handle());
}

#[test]
fn test_custom_profile() {
    let (bridge, _control) = bridge_with_profile(StubProfile {
        center_freqs_mhz: vec![31_000, 125_000, 500_000, 2_000_000, 8_000_000, 16_000_000],
        min_level_mb: -1200,
        max_level_mb: 1200,
    });
    send(&bridge, "init", json!({"sessionId": 9}));

    assert_eq!(
        send(&bridge, "getBandLevelRange", Value::Null)["value"],
        json!([-1200, 1200])
    );
    assert_eq!(
        send(&bridge, "getCenterBandFreqs", Value::Null)["value"]
            .as_array()
            .map(Vec::len),
        Some(6)
    );
}

#[test]
fn test_typed_dispatch_matches_envelope() {
    let (bridge, _control) = bridge();

    let reply = bridge.handle(&MethodCall::new("getBandLevelRange", Value::Null));
    assert_eq!(reply.error_code(), Some("RANGE_ERROR"));

    let reply = bridge.handle(&MethodCall::new("init", json!({"sessionId": 2})));
    assert_eq!(reply, MethodResult::success(true));
}
