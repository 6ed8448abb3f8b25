use crate::channel::MethodResult;

/// Kind of reply to an equalizer call
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ReplyStatus {
    Success,
    Error,
    NotImplemented,
}

/// FFI-friendly reply to an equalizer call
///
/// Success values are carried as JSON text (`true`, `300`, `[-1500,1500]`).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EqualizerReply {
    pub status: ReplyStatus,
    pub value_json: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl From<MethodResult> for EqualizerReply {
    fn from(result: MethodResult) -> Self {
        match result {
            MethodResult::Success { value } => Self {
                status: ReplyStatus::Success,
                value_json: Some(value.to_string()),
                code: None,
                message: None,
            },
            MethodResult::Error { code, message, .. } => Self {
                status: ReplyStatus::Error,
                value_json: None,
                code: Some(code),
                message,
            },
            MethodResult::NotImplemented => Self {
                status: ReplyStatus::NotImplemented,
                value_json: None,
                code: None,
                message: None,
            },
        }
    }
}
