use serde::{Deserialize, Serialize};

/// Desktop account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Absent for accounts created through an external identity provider
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

/// Fields needed to create a desktop account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

impl NewUser {
    /// Validate username and email before insertion
    pub fn validate(&self) -> Result<(), String> {
        let username = self.username.trim();
        if username.is_empty() || username.len() > 80 {
            return Err("Username must be 1-80 characters".to_string());
        }
        if self.email.len() > 120 || !self.email.contains('@') {
            return Err("Invalid email address".to_string());
        }
        if self.password_hash.is_none() && self.google_id.is_none() {
            return Err("Account needs a password or an external identity".to_string());
        }
        Ok(())
    }
}
