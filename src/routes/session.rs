use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_sessions::Session;

use crate::auth::AuthUser;
use crate::constants::SESSION_USER_ID_KEY;
use crate::error::{AppError, Result};
use crate::security::{mint_token, verify_password, verify_security_code};
use crate::DesktopState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Kept loose so a numeric code is rejected as wrong rather than malformed
    #[serde(rename = "securityCode")]
    pub security_code: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

/// Log in to the desktop shell
///
/// POST /api/auth/login
///
/// Checks, in order: all fields present, security code, username and
/// password. On success the session id is rotated, the user id stored in the
/// session and a one-hour signed token returned alongside.
pub async fn login(
    State(state): State<DesktopState>,
    session: Session,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Ok(Json(payload)) = payload else {
        return Err(AppError::MissingFields);
    };

    let (Some(username), Some(password), Some(security_code)) =
        (payload.username, payload.password, payload.security_code)
    else {
        return Err(AppError::MissingFields);
    };

    if !security_code.as_str().is_some_and(verify_security_code) {
        tracing::warn!("Invalid security code for login attempt as {}", username);
        return Err(AppError::InvalidSecurityCode);
    }

    let Some(user) = state.repo.find_user_by_username(&username).await? else {
        tracing::warn!("Login attempt for unknown user {}", username);
        return Err(AppError::InvalidCredentials);
    };

    let Some(hash) = user.password_hash.clone() else {
        tracing::warn!("Password login attempt for external-identity user {}", username);
        return Err(AppError::InvalidCredentials);
    };

    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await?
        .map_err(AppError::PasswordHash)?;

    if !valid {
        tracing::warn!("Wrong password for user {}", username);
        return Err(AppError::InvalidCredentials);
    }

    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user.id).await?;

    let token = mint_token(user.id, Utc::now().timestamp(), &state.secret_key)
        .map_err(|e| AppError::Token(e.to_string()))?;

    tracing::info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        status: "success",
        token,
    }))
}

/// GET /api/auth/logout
pub async fn logout(user: AuthUser, session: Session) -> Result<Json<Value>> {
    session.flush().await?;
    tracing::info!("User {} logged out", user.id);
    Ok(Json(json!({ "status": "success" })))
}

/// GET /api/auth/check-status
pub async fn check_status(user: Option<AuthUser>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        authenticated: user.is_some(),
    })
}
