//! Session-backed principals and the lite shell's credential lookup.
//!
//! Handlers that need a signed-in user take [`AuthUser`] (desktop) or
//! [`SessionUsername`] (lite) as an argument; extraction fails with
//! `401 Unauthorized` when the session carries no identity. Handlers that only
//! report state take `Option<...>` instead.

use std::collections::HashMap;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::config::LiteUser;
use crate::constants::{SESSION_USERNAME_KEY, SESSION_USER_ID_KEY};
use crate::error::AppError;

async fn session_from_parts<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> Result<Session, AppError> {
    Session::from_request_parts(parts, state)
        .await
        .map_err(|(_, reason)| AppError::SessionLayer(reason))
}

/// Desktop user proven by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).await?;
        let id: Option<i64> = session.get(SESSION_USER_ID_KEY).await?;
        id.map(|id| AuthUser { id }).ok_or(AppError::Unauthorized)
    }
}

/// Lite shell user proven by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUsername(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUsername
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state).await?;
        let username: Option<String> = session.get(SESSION_USERNAME_KEY).await?;
        username.map(SessionUsername).ok_or(AppError::Unauthorized)
    }
}

// =============================================================================
// Lite Credentials
// =============================================================================

/// Account known to the lite shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub password: String,
    pub name: String,
}

/// Username lookup used by the lite shell's login
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<&Credential>;

    /// Display name when `username`/`password` match an account
    fn authenticate(&self, username: &str, password: &str) -> Option<&str> {
        self.lookup(username)
            .filter(|credential| credential.password == password)
            .map(|credential| credential.name.as_str())
    }
}

/// Fixed credential table built at startup
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, Credential>,
}

impl StaticCredentials {
    pub fn new(users: impl IntoIterator<Item = LiteUser>) -> Self {
        let users = users
            .into_iter()
            .map(|user| {
                (
                    user.username,
                    Credential {
                        password: user.password,
                        name: user.name,
                    },
                )
            })
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialStore for StaticCredentials {
    fn lookup(&self, username: &str) -> Option<&Credential> {
        self.users.get(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StaticCredentials {
        StaticCredentials::new(vec![LiteUser {
            username: "admin".to_string(),
            password: "admin".to_string(),
            name: "Administrator".to_string(),
        }])
    }

    #[test]
    fn test_authenticate_match() {
        assert_eq!(store().authenticate("admin", "admin"), Some("Administrator"));
    }

    #[test]
    fn test_authenticate_wrong_password() {
        assert_eq!(store().authenticate("admin", "Admin"), None);
    }

    #[test]
    fn test_authenticate_unknown_user() {
        assert_eq!(store().authenticate("root", "admin"), None);
    }

    #[test]
    fn test_later_entries_override_earlier() {
        let store = StaticCredentials::new(vec![
            LiteUser {
                username: "ops".to_string(),
                password: "old".to_string(),
                name: "Old".to_string(),
            },
            LiteUser {
                username: "ops".to_string(),
                password: "new".to_string(),
                name: "New".to_string(),
            },
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.authenticate("ops", "new"), Some("New"));
    }
}
