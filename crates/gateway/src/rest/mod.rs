//! REST API endpoints for the gateway

pub mod conversation;
pub mod group;
pub mod health;
pub mod message;
pub mod upload;
pub mod user;

use axum::Router;
use std::sync::Arc;

use crate::state::GatewayState;

/// Create all authenticated REST API routes, mounted under `/api`
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .merge(conversation::create_conversation_routes())
        .merge(message::create_message_routes())
        .merge(group::create_group_routes())
        .merge(user::create_user_routes())
        .merge(upload::create_upload_routes())
}
