use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::envelope::lenient_message;

/// Body of a non-2xx reply.
///
/// The API normally sends `{ "code": 401, "message": "...", "data": null }`,
/// but proxies and framework fallbacks may send anything, so every field is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, deserialize_with = "lenient_message")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl ErrorBody {
    pub fn new(code: i64, message: &str) -> Self {
        Self {
            code: Some(code),
            message: Some(message.to_string()),
            data: Value::Null,
        }
    }

    /// Server-provided message, ignoring blank strings.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}
