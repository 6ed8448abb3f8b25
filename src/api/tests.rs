use super::*;

#[test]
fn test_get_version() {
    let result = get_version().unwrap();
    assert_eq!(result, "0.1.0");
}

#[test]
fn test_channel_name() {
    assert_eq!(equalizer_channel_name(), "com.ezra.musicplayer/equalizer");
}

#[test]
fn test_unknown_method_reply() {
    let reply = handle_equalizer_call("shuffle".to_string(), String::new());
    assert_eq!(reply.status, ReplyStatus::NotImplemented);
    assert_eq!(reply.code, None);
}

#[test]
fn test_invalid_args_reply() {
    let reply = handle_equalizer_call("getBandLevel".to_string(), "{}".to_string());
    assert_eq!(reply.status, ReplyStatus::Error);
    assert_eq!(reply.code.as_deref(), Some("INVALID_ARGS"));
    assert_eq!(reply.message.as_deref(), Some("Band index required"));
}

#[test]
fn test_success_reply_carries_json_value() {
    let reply: EqualizerReply = crate::channel::MethodResult::success(serde_json::json!([-1500, 1500])).into();
    assert_eq!(reply.status, ReplyStatus::Success);
    assert_eq!(reply.value_json.as_deref(), Some("[-1500,1500]"));
}

#[test]
fn test_error_codes_getters() {
    assert_eq!(EqualizerErrorCodes::invalid_args(), "INVALID_ARGS");
    assert_eq!(EqualizerErrorCodes::set_level_error(), "SET_LEVEL_ERROR");
}

#[test]
fn test_diagnostics_json_is_valid() {
    let json = equalizer_diagnostics_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("total_events").is_some());
}

// The only test that creates an effect on the global bridge; the others
// must not depend on whether one is held.
#[test]
fn test_release_equalizer_drops_global_handle() {
    let reply = handle_equalizer_call("init".to_string(), r#"{"sessionId": 42}"#.to_string());
    assert_eq!(reply.status, ReplyStatus::Success);
    assert!(bridge().has_handle());

    release_equalizer();

    assert!(!bridge().has_handle());
    let reply = handle_equalizer_call("isEnabled".to_string(), String::new());
    assert_eq!(reply.status, ReplyStatus::Success);
    assert_eq!(reply.value_json.as_deref(), Some("false"));

    // Teardown without an effect is still fine
    release_equalizer();
    assert!(!bridge().has_handle());
}
