use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::{SettingsResponse, SettingsUpdate};
use crate::DesktopState;

/// GET /api/settings
pub async fn get_settings(
    State(state): State<DesktopState>,
    user: AuthUser,
) -> Result<Json<SettingsResponse>> {
    let settings = state
        .repo
        .settings_for_user(user.id)
        .await?
        .map(SettingsResponse::from)
        .unwrap_or_default();

    Ok(Json(settings))
}

/// Update dark mode and/or wallpaper; omitted fields are left unchanged
///
/// PUT /api/settings
pub async fn update_settings(
    State(state): State<DesktopState>,
    user: AuthUser,
    payload: std::result::Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsResponse>> {
    let Json(update) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let saved = state.repo.save_settings(user.id, &update).await?;

    tracing::info!("Settings updated for user {}", user.id);

    Ok(Json(saved.into()))
}
