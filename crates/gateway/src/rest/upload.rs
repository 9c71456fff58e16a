//! Attachment upload endpoint

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Extension, Json, Router,
};
use courier_database::User;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{GatewayError, GatewayResult};
use crate::rest::message::ErrorResponse;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public URLs for the stored files, in upload order
    pub urls: Vec<String>,
}

/// Create upload routes
pub fn create_upload_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/uploads", axum::routing::post(upload_files))
}

#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "Uploads",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Files stored", body = UploadResponse),
        (status = 400, description = "Empty or malformed upload", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn upload_files(
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
    mut multipart: Multipart,
) -> GatewayResult<impl IntoResponse> {
    let mut urls = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| GatewayError::InvalidRequest(format!("failed to read upload: {}", e)))?;
        if bytes.is_empty() {
            continue;
        }
        let url = state
            .media_store
            .store(&bytes, &filename)
            .await
            .map_err(|e| GatewayError::InternalError(e.to_string()))?;
        urls.push(url);
    }

    if urls.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "no files in upload".to_string(),
        ));
    }

    tracing::info!(user_id = user.id, files = urls.len(), "upload complete");
    Ok((
        axum::http::StatusCode::CREATED,
        Json(UploadResponse { urls }),
    ))
}
