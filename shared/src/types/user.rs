use std::fmt;

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user as returned by `/users/me/` and the login
/// endpoint. Only `id`, `username` and `role` are guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub role_display: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<i64>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UserProfile {
    /// Minimal profile, mostly useful for tests and fixtures.
    pub fn new(id: i64, username: &str, role: &str) -> Self {
        Self {
            id,
            username: username.to_string(),
            role: role.to_string(),
            role_display: None,
            email: None,
            phone: None,
            department: None,
            department_name: None,
            employee_id: None,
            position: None,
            first_name: None,
            last_name: None,
            is_active: None,
        }
    }
}

/// Roles known to the API. Route metadata and profiles carry them as plain
/// strings; this enum gives them names on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Client,
    Receiver,
    Tester,
    Reviewer,
    Approver,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Client,
        Role::Receiver,
        Role::Tester,
        Role::Reviewer,
        Role::Approver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client => "client",
            Self::Receiver => "receiver",
            Self::Tester => "tester",
            Self::Reviewer => "reviewer",
            Self::Approver => "approver",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Roles that take part in the sample workflow.
    pub fn is_staff(&self) -> bool {
        !matches!(self, Self::Client)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Account management payloads
// ---------------------------------------------------------------------------

/// Body of `/users/change_password/`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ChangePasswordData {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Body of `/users/{id}/reset_password/` (admin only).
#[derive(Clone, Serialize, Deserialize)]
pub struct ResetPasswordData {
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default)]
    pub children: Vec<Department>,
}
