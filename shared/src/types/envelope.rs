use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Envelope `code` the API uses for a successful operation.
pub const SUCCESS_CODE: i64 = 200;

/// Normalized reply returned by every API endpoint on HTTP 2xx.
///
/// ```json
/// { "code": 200, "message": "success", "data": { ... } }
/// ```
///
/// The client layer hands this back untouched; callers branch on `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub code: i64,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, deserialize_with = "lenient_message")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

impl ApiResponse<Value> {
    /// Re-read `data` as a concrete type. A `null`/missing payload stays `None`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<ApiResponse<T>, serde_json::Error> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };

        Ok(ApiResponse {
            code: self.code,
            data,
            message: self.message,
        })
    }
}

/// Accepts any JSON for a `message` field.
///
/// Validation failures come back with an object of field errors in place of
/// a string; those are kept as their JSON text.
pub fn lenient_message<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
