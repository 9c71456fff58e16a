//! # Courier Gateway
//!
//! HTTP and websocket surface of the Courier backend. REST endpoints cover
//! conversations, groups, message lifecycle, users, and uploads; the `/ws`
//! endpoint delivers push events to connected clients. Every route except
//! `/health` requires a bearer token.

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod websocket;

pub use error::{GatewayError, GatewayResult};
pub use state::GatewayState;

use axum::{http::Method, middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);

    let authenticated = Router::new()
        .nest("/api", rest::create_rest_routes())
        .merge(websocket::create_websocket_routes())
        .layer(axum_middleware::from_fn_with_state(
            arc_state.clone(),
            middleware::auth_middleware,
        ));

    #[allow(unused_mut)]
    let mut router = Router::new()
        .route("/health", get(rest::health::health_check))
        .merge(authenticated)
        .with_state(arc_state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers(Any),
        )
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    #[cfg(debug_assertions)]
    {
        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::health::health_check,
                rest::conversation::send_message,
                rest::conversation::list_conversation,
                rest::conversation::mark_read,
                rest::message::unread_counts,
                rest::message::update_message,
                rest::message::delete_message,
                rest::group::create_group,
                rest::group::list_groups,
                rest::group::send_group_message,
                rest::group::list_group_messages,
                rest::user::list_users,
                rest::upload::upload_files,
            ),
            components(
                schemas(
                    rest::health::HealthResponse,
                    rest::conversation::SendMessageRequest,
                    rest::conversation::ReadReceiptResponse,
                    rest::message::MessageResponse,
                    rest::message::UnreadCountResponse,
                    rest::message::UpdateMessageRequest,
                    rest::message::ErrorResponse,
                    rest::group::GroupResponse,
                    rest::group::CreateGroupRequest,
                    rest::user::UserResponse,
                    rest::upload::UploadResponse,
                )
            ),
            tags(
                (name = "Health", description = "Service health"),
                (name = "Conversations", description = "Direct messaging"),
                (name = "Messages", description = "Message lifecycle and read state"),
                (name = "Groups", description = "Group messaging"),
                (name = "Users", description = "User directory"),
                (name = "Uploads", description = "Attachment uploads"),
            )
        )]
        struct ApiDoc;

        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
}
