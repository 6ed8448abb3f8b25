//! Method-channel contract shared with the Dart caller.
//!
//! The channel name, method names and argument keys are reproduced exactly;
//! the Dart side addresses the bridge by these strings.

mod codec;

pub use codec::{MethodCall, MethodResult};

/// Channel the bridge registers with the Flutter engine.
pub const CHANNEL_NAME: &str = "com.ezra.musicplayer/equalizer";

/// Argument keys.
pub mod keys {
    pub const SESSION_ID: &str = "sessionId";
    pub const ENABLE: &str = "enable";
    pub const BAND: &str = "band";
    pub const LEVEL: &str = "level";
}

/// Methods understood by the bridge. Any other name is "not implemented".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualizerMethod {
    Init,
    Release,
    Enable,
    IsEnabled,
    GetBandLevelRange,
    GetCenterBandFreqs,
    GetBandLevel,
    SetBandLevel,
}

impl EqualizerMethod {
    pub const ALL: [EqualizerMethod; 8] = [
        EqualizerMethod::Init,
        EqualizerMethod::Release,
        EqualizerMethod::Enable,
        EqualizerMethod::IsEnabled,
        EqualizerMethod::GetBandLevelRange,
        EqualizerMethod::GetCenterBandFreqs,
        EqualizerMethod::GetBandLevel,
        EqualizerMethod::SetBandLevel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EqualizerMethod::Init => "init",
            EqualizerMethod::Release => "release",
            EqualizerMethod::Enable => "enable",
            EqualizerMethod::IsEnabled => "isEnabled",
            EqualizerMethod::GetBandLevelRange => "getBandLevelRange",
            EqualizerMethod::GetCenterBandFreqs => "getCenterBandFreqs",
            EqualizerMethod::GetBandLevel => "getBandLevel",
            EqualizerMethod::SetBandLevel => "setBandLevel",
        }
    }

    /// Case-sensitive lookup by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == name)
    }

    /// Argument keys the method reads
    pub fn argument_keys(self) -> &'static [&'static str] {
        match self {
            EqualizerMethod::Init => &[keys::SESSION_ID],
            EqualizerMethod::Enable => &[keys::ENABLE],
            EqualizerMethod::GetBandLevel => &[keys::BAND],
            EqualizerMethod::SetBandLevel => &[keys::BAND, keys::LEVEL],
            EqualizerMethod::Release
            | EqualizerMethod::IsEnabled
            | EqualizerMethod::GetBandLevelRange
            | EqualizerMethod::GetCenterBandFreqs => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_round_trip() {
        for method in EqualizerMethod::ALL {
            assert_eq!(EqualizerMethod::from_name(method.as_str()), Some(method));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(EqualizerMethod::from_name("isenabled"), None);
        assert_eq!(EqualizerMethod::from_name("Init"), None);
        assert_eq!(EqualizerMethod::from_name(""), None);
    }

    #[test]
    fn test_set_band_level_keys() {
        assert_eq!(
            EqualizerMethod::SetBandLevel.argument_keys(),
            &["band", "level"]
        );
    }
}
