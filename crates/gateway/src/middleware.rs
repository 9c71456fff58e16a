//! Middleware for authentication and request logging

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use courier_database::User;
use std::sync::Arc;

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

/// Authentication middleware. Accepts a bearer token in the Authorization
/// header or a `token` query parameter (websocket clients cannot set
/// headers), resolves it to a user, and stores the user in the request
/// extensions.
pub async fn auth_middleware(
    State(state): State<Arc<GatewayState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let header_token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let query_token = request.uri().query().and_then(token_from_query);

    let token = header_token.or(query_token).ok_or_else(|| {
        GatewayError::AuthenticationFailed("Missing authentication token".to_string())
    })?;

    let user = state.user_service.authenticate(&token).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Tokens arrive percent-encoded in the query string, so the value is
/// decoded before it is compared against stored tokens.
fn token_from_query(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("token"), Some(value)) if !value.is_empty() => {
                urlencoding::decode(value).ok().map(|value| value.into_owned())
            }
            _ => None,
        }
    })
}

/// Extract the authenticated user placed by [`auth_middleware`]
pub fn extract_user(request: &Request) -> GatewayResult<User> {
    request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or_else(|| GatewayError::AuthenticationFailed("User not authenticated".to_string()))
}

/// Logging middleware for request/response logging
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}
