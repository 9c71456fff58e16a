//! User listing endpoint

use axum::{extract::State, Extension, Json, Router};
use courier_database::User;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::GatewayResult;
use crate::rest::message::ErrorResponse;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.public_id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
        }
    }
}

/// Create user routes
pub fn create_user_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/users", axum::routing::get(list_users))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Every user except the caller", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
) -> GatewayResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_contacts(&user).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
