use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use super::services::{MAX_UPLOAD_BYTES, UploadedFile, is_allowed_media};
use crate::error::WebError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "Single `file` field, image/* or video/*, at most 25 MB"),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing, oversized or disallowed file"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "upload"
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_allowed_media(&content_type) {
            return Err(WebError::BadRequest("Only image/video allowed".to_string()));
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(WebError::BadRequest("File too large".to_string()));
        }

        file = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let file = file.ok_or_else(|| WebError::BadRequest("No file".to_string()))?;
    let url = state.uploads.store(file).await?;

    Ok((StatusCode::CREATED, Json(UploadResponse { url })).into_response())
}

fn multipart_error(e: MultipartError) -> WebError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        WebError::BadRequest("File too large".to_string())
    } else {
        WebError::BadRequest(e.body_text())
    }
}
