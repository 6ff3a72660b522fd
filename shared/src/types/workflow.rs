use std::fmt;

use serde::{Deserialize, Serialize};

/// Stages a received sample moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Received,
    Assigned,
    Testing,
    TestCompleted,
    ReportEditing,
    UnderReview,
    UnderApproval,
    Completed,
    Rejected,
}

impl WorkflowStatus {
    /// Statuses the server accepts as `to_status` from `self`.
    ///
    /// Mirrors the server's transition table so screens only offer valid
    /// moves; the server stays authoritative.
    pub fn next_statuses(&self) -> &'static [WorkflowStatus] {
        use WorkflowStatus::*;
        match self {
            Received => &[Assigned],
            Assigned => &[Testing, Rejected],
            Testing => &[TestCompleted, Rejected],
            TestCompleted => &[ReportEditing, Rejected],
            ReportEditing => &[UnderReview],
            UnderReview => &[UnderApproval, Rejected],
            UnderApproval => &[Completed, Rejected],
            Rejected => &[Assigned],
            Completed => &[],
        }
    }

    pub fn can_transition_to(&self, to: WorkflowStatus) -> bool {
        self.next_statuses().contains(&to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Assigned => "assigned",
            Self::Testing => "testing",
            Self::TestCompleted => "test_completed",
            Self::ReportEditing => "report_editing",
            Self::UnderReview => "under_review",
            Self::UnderApproval => "under_approval",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `/workflow/{id}/transition/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionData {
    pub to_status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Body of `/workflow/{id}/assign/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignData {
    pub assigned_to: i64,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

pub fn default_priority() -> i64 {
    1
}
