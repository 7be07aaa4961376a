//! Image upload for post illustrations.
//!
//! Clients upload first, then pass the returned `filePath` as `imageUrl` in
//! `createPost`/`updatePost`.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::put,
};
use axum_helpers::{AppError, AuthUser};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Uploads above this size are rejected before the handler runs
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTED_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// An accepted image field
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/post-image", put(upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Store an image and optionally clear the one it replaces
#[utoipa::path(
    put,
    path = "/post-image",
    tag = "Images",
    request_body(content_type = "multipart/form-data", description = "`image` file (png/jpg/jpeg), optional `oldPath`"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 200, description = "No file provided", body = UploadResponse),
        (status = 401, description = "Not authenticated", body = axum_helpers::ErrorResponse)
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut multipart = multipart?;

    let mut upload = None;
    let mut old_path = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let accepted = field
                    .content_type()
                    .is_some_and(|ct| ACCEPTED_TYPES.contains(&ct));
                if !accepted {
                    tracing::debug!(content_type = ?field.content_type(), "Ignoring non-image upload");
                    continue;
                }
                let file_name = field.file_name().unwrap_or("image").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                upload = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            Some("oldPath") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if !text.is_empty() {
                    old_path = Some(text);
                }
            }
            _ => {}
        }
    }

    let Some(upload) = upload else {
        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                message: "No file provided".to_string(),
                file_path: None,
            }),
        ));
    };

    if let Some(old_path) = old_path {
        if let Err(e) = state.images.remove(&old_path).await {
            tracing::warn!(user_id = %user_id, "Could not clear old image {}: {}", old_path, e);
        }
    }

    let file_path = state
        .images
        .save(&upload.file_name, &upload.bytes)
        .await
        .map_err(AppError::from)?;

    tracing::info!(user_id = %user_id, file_path = %file_path, "Post image uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File stored".to_string(),
            file_path: Some(file_path),
        }),
    ))
}
