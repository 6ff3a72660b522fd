use serde::{Deserialize, Serialize};

/// Body of `/users/auth/register/` and of admin user creation (`/users/`).
#[derive(Clone, Serialize, Deserialize)]
pub struct RegistrationData {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl RegistrationData {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            password_confirm: password.to_string(),
            email: None,
            phone: None,
            role: None,
            department: None,
            first_name: None,
            last_name: None,
        }
    }

    /// Same check the server runs before creating the account.
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirm
    }
}
