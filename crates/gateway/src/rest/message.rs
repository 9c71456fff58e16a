//! Message lifecycle endpoints: unread counts, edit, delete

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json, Router,
};
use courier_database::{Message, UnreadCount, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::GatewayResult;
use crate::state::GatewayState;

/// A message as clients see it. Internal row ids never leave the server;
/// every id here is a public one.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: Option<String>,
    pub group_id: Option<String>,
    pub content: String,
    pub kind: String,
    pub attachment_urls: Vec<String>,
    pub read: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.public_id,
            sender_id: message.sender_public_id,
            receiver_id: message.receiver_public_id,
            group_id: message.group_public_id,
            content: message.content,
            kind: message.kind.to_string(),
            attachment_urls: message.attachment_urls,
            read: message.read,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub sender_id: String,
    pub count: i64,
}

impl From<UnreadCount> for UnreadCountResponse {
    fn from(count: UnreadCount) -> Self {
        Self {
            sender_id: count.sender_public_id,
            count: count.count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Create message routes
pub fn create_message_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/messages/unread", axum::routing::get(unread_counts))
        .route(
            "/messages/:message_id",
            axum::routing::put(update_message).delete(delete_message),
        )
}

#[utoipa::path(
    get,
    path = "/api/messages/unread",
    tag = "Messages",
    responses(
        (status = 200, description = "Unread totals per sender", body = Vec<UnreadCountResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn unread_counts(
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
) -> GatewayResult<Json<Vec<UnreadCountResponse>>> {
    let counts = state.message_service.unread_counts(&user).await?;
    Ok(Json(counts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    put,
    path = "/api/messages/{message_id}",
    tag = "Messages",
    params(
        ("message_id" = String, Path, description = "Message public ID")
    ),
    request_body = UpdateMessageRequest,
    responses(
        (status = 200, description = "Message updated", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the sender", body = ErrorResponse),
        (status = 404, description = "Message not found", body = ErrorResponse)
    )
)]
pub async fn update_message(
    Path(message_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<UpdateMessageRequest>,
) -> GatewayResult<Json<MessageResponse>> {
    let message = state
        .message_service
        .edit_message(&user, &message_id, &payload.content)
        .await?;
    Ok(Json(message.into()))
}

#[utoipa::path(
    delete,
    path = "/api/messages/{message_id}",
    tag = "Messages",
    params(
        ("message_id" = String, Path, description = "Message public ID")
    ),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the sender", body = ErrorResponse),
        (status = 404, description = "Message not found", body = ErrorResponse)
    )
)]
pub async fn delete_message(
    Path(message_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
) -> GatewayResult<impl IntoResponse> {
    state.message_service.delete_message(&user, &message_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
