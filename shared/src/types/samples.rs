use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Read models for the sample-intake screens. Only the columns the list views
// rely on are typed; everything else stays in `extra`.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Draft,
    Submitted,
    Received,
    Testing,
    Completed,
    Cancelled,
}

impl CommissionStatus {
    /// Only drafts can be submitted.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Work that has not started testing can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Draft | Self::Submitted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRecord {
    pub id: i64,
    pub code: String,
    pub client: i64,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub sample_name: Option<String>,
    pub status: CommissionStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveRecord {
    pub id: i64,
    pub commission: i64,
    #[serde(default)]
    pub receive_code: Option<String>,
    #[serde(default)]
    pub commission_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
