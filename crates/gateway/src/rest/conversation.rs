//! Direct conversation endpoints

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json, Router,
};
use courier_database::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::GatewayResult;
use crate::rest::message::{ErrorResponse, MessageResponse};
use crate::state::GatewayState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub content: Option<String>,
    #[serde(default)]
    pub attachment_urls: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadReceiptResponse {
    /// How many messages flipped from unread to read
    pub updated: u64,
}

/// Create conversation routes
pub fn create_conversation_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/conversations/:user_id/messages",
            axum::routing::get(list_conversation).post(send_message),
        )
        .route(
            "/conversations/:user_id/read",
            axum::routing::post(mark_read),
        )
}

#[utoipa::path(
    post,
    path = "/api/conversations/{user_id}/messages",
    tag = "Conversations",
    params(
        ("user_id" = String, Path, description = "Receiver public ID")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Receiver not found", body = ErrorResponse)
    )
)]
pub async fn send_message(
    Path(user_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<SendMessageRequest>,
) -> GatewayResult<impl IntoResponse> {
    let message = state
        .message_service
        .send_direct(&user, &user_id, payload.content, payload.attachment_urls)
        .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(MessageResponse::from(message)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/conversations/{user_id}/messages",
    tag = "Conversations",
    params(
        ("user_id" = String, Path, description = "Counterpart public ID")
    ),
    responses(
        (status = 200, description = "Conversation history, oldest first", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_conversation(
    Path(user_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
) -> GatewayResult<Json<Vec<MessageResponse>>> {
    let messages = state
        .message_service
        .list_conversation(&user, &user_id)
        .await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/conversations/{user_id}/read",
    tag = "Conversations",
    params(
        ("user_id" = String, Path, description = "Sender public ID whose messages to mark read")
    ),
    responses(
        (status = 200, description = "Messages marked read", body = ReadReceiptResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn mark_read(
    Path(user_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
) -> GatewayResult<Json<ReadReceiptResponse>> {
    let updated = state.message_service.mark_read(&user, &user_id).await?;
    Ok(Json(ReadReceiptResponse { updated }))
}
