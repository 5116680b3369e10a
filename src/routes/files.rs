use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::FileResponse;
use crate::routes::validation::read_upload_form;
use crate::DesktopState;

/// List every file owned by the signed-in user
///
/// GET /api/files
pub async fn list_files(
    State(state): State<DesktopState>,
    user: AuthUser,
) -> Result<Json<Vec<FileResponse>>> {
    let files = state.repo.files_for_user(user.id).await?;

    tracing::debug!("Listing {} files for user {}", files.len(), user.id);

    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// Accept a desktop file upload
///
/// POST /api/files/upload
///
/// Validates the form and reports success, but nothing is stored and no
/// metadata row is created: file persistence is not implemented.
pub async fn upload_file(
    user: AuthUser,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>> {
    let form = read_upload_form(multipart).await?;

    let file = form.file.ok_or(AppError::NoFileProvided)?;
    if file.filename.is_empty() {
        return Err(AppError::NoFileSelected);
    }

    tracing::warn!(
        "Upload of {} ({} bytes) by user {} accepted but not persisted",
        file.filename,
        file.data.len(),
        user.id
    );

    Ok(Json(json!({
        "status": "success",
        "message": "File uploaded successfully"
    })))
}
