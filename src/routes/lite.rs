use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_sessions::Session;

use crate::auth::SessionUsername;
use crate::constants::{ERR_INVALID_CREDENTIALS, SESSION_USERNAME_KEY};
use crate::error::Result;
use crate::LiteState;

#[derive(Debug, Deserialize)]
pub struct LiteLoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LiteLoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CheckLoginResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Log in against the configured credential table
///
/// POST /api/login
pub async fn login(
    State(state): State<LiteState>,
    session: Session,
    payload: std::result::Result<Json<LiteLoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LiteLoginResponse>)> {
    let (username, password) = match payload {
        Ok(Json(LiteLoginRequest {
            username: Some(username),
            password: Some(password),
        })) => (username, password),
        _ => (String::new(), String::new()),
    };

    let Some(name) = state.credentials.authenticate(&username, &password) else {
        tracing::warn!("Failed lite login for {:?}", username);
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(LiteLoginResponse {
                success: false,
                name: None,
                error: Some(ERR_INVALID_CREDENTIALS),
            }),
        ));
    };
    let name = name.to_string();

    session.cycle_id().await?;
    session.insert(SESSION_USERNAME_KEY, &username).await?;

    tracing::info!("Lite user {} logged in", username);

    Ok((
        StatusCode::OK,
        Json(LiteLoginResponse {
            success: true,
            name: Some(name),
            error: None,
        }),
    ))
}

/// POST /api/logout
pub async fn logout(session: Session) -> Result<Json<Value>> {
    session.remove::<String>(SESSION_USERNAME_KEY).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/check-login
pub async fn check_login(
    State(state): State<LiteState>,
    user: Option<SessionUsername>,
) -> Json<CheckLoginResponse> {
    let logged_in = user.and_then(|SessionUsername(username)| {
        let name = state.credentials.lookup(&username)?.name.clone();
        Some((username, name))
    });

    Json(match logged_in {
        Some((username, name)) => CheckLoginResponse {
            logged_in: true,
            username: Some(username),
            name: Some(name),
        },
        None => CheckLoginResponse {
            logged_in: false,
            username: None,
            name: None,
        },
    })
}
