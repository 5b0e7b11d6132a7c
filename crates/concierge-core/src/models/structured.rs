use serde::{Deserialize, Serialize};

/// Failure categories of the structured data engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFailure {
    /// The underlying store errored or timed out.
    Storage,
    /// No structured operation exists for the intent.
    UnsupportedIntent,
    /// The operation exists but not for this role.
    NotPermitted,
}

/// Envelope returned by the structured data engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResult {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub count: usize,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<DataFailure>,
}

impl DataResult {
    pub fn ok(data: serde_json::Value, count: usize, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            count,
            message: message.into(),
            failure: None,
        }
    }

    /// Error envelope. `message` must be safe to show a user.
    pub fn error(failure: DataFailure, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: 0,
            message: message.into(),
            failure: Some(failure),
        }
    }
}
