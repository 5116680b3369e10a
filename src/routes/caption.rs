use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::constants::ERR_INVALID_FILENAME;
use crate::error::{AppError, Result};
use crate::models::CaptionResult;
use crate::routes::validation::{allowed_file, read_upload_form, secure_filename};
use crate::CaptionState;

/// Accept an image or video upload and return the caption suggestion
///
/// POST /upload (multipart: `file`, `platform`, `style`)
///
/// The file is stored under the upload directory; same-name uploads
/// overwrite each other. The returned caption is a fixed placeholder, no
/// media processing happens.
pub async fn upload(
    State(state): State<CaptionState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<CaptionResult>> {
    let form = read_upload_form(multipart).await?;

    let file = form.file.as_ref().ok_or(AppError::NoFilePart)?;

    if file.filename.is_empty() {
        return Err(AppError::NoSelectedFile);
    }

    if !allowed_file(&file.filename) {
        tracing::warn!("Rejected upload with disallowed type: {}", file.filename);
        return Err(AppError::FileTypeNotAllowed);
    }

    let stored_name = secure_filename(&file.filename);
    if stored_name.is_empty() {
        return Err(AppError::InvalidInput(ERR_INVALID_FILENAME.to_string()));
    }

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(upload_dir.join(&stored_name), &file.data).await?;

    let platform = form.field("platform").unwrap_or_default();
    let style = form.field("style").unwrap_or_default();

    tracing::info!(
        "Stored upload {} ({} bytes) for {} / {}",
        stored_name,
        file.data.len(),
        platform,
        style
    );

    Ok(Json(CaptionResult::placeholder(platform, style, &stored_name)))
}
