//! Group endpoints

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json, Router,
};
use courier_database::{Group, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::GatewayResult;
use crate::rest::conversation::SendMessageRequest;
use crate::rest::message::{ErrorResponse, MessageResponse};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_by: String,
    pub members: Vec<String>,
    pub created_at: String,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.public_id,
            name: group.name,
            avatar_url: group.avatar_url,
            created_by: group.created_by_public_id,
            members: group.member_public_ids,
            created_at: group.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    /// Public IDs of the initial members. The creator is added implicitly.
    pub members: Vec<String>,
    pub avatar_url: Option<String>,
}

/// Create group routes
pub fn create_group_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/groups",
            axum::routing::get(list_groups).post(create_group),
        )
        .route(
            "/groups/:group_id/messages",
            axum::routing::get(list_group_messages).post(send_group_message),
        )
}

#[utoipa::path(
    post,
    path = "/api/groups",
    tag = "Groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupResponse),
        (status = 400, description = "Invalid name or member set", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn create_group(
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateGroupRequest>,
) -> GatewayResult<impl IntoResponse> {
    let group = state
        .group_service
        .create_group(&user, &payload.name, &payload.members, payload.avatar_url)
        .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(GroupResponse::from(group)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/groups",
    tag = "Groups",
    responses(
        (status = 200, description = "Groups the caller belongs to", body = Vec<GroupResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_groups(
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
) -> GatewayResult<Json<Vec<GroupResponse>>> {
    let groups = state.group_service.list_for_user(&user).await?;
    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/messages",
    tag = "Groups",
    params(
        ("group_id" = String, Path, description = "Group public ID")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent to group", body = MessageResponse),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn send_group_message(
    Path(group_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
    Json(payload): Json<SendMessageRequest>,
) -> GatewayResult<impl IntoResponse> {
    let message = state
        .message_service
        .send_group(&user, &group_id, payload.content, payload.attachment_urls)
        .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(MessageResponse::from(message)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/messages",
    tag = "Groups",
    params(
        ("group_id" = String, Path, description = "Group public ID")
    ),
    responses(
        (status = 200, description = "Group history, oldest first", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn list_group_messages(
    Path(group_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
) -> GatewayResult<Json<Vec<MessageResponse>>> {
    let messages = state
        .message_service
        .list_group_conversation(&user, &group_id)
        .await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}
