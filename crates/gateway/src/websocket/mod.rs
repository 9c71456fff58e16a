//! WebSocket endpoint for real-time delivery
//!
//! Clients connect to `/ws` with their token, send a `join` event to come
//! online, and from then on receive [`PushEvent`]s as JSON text frames.
//! Dropping the connection (or being displaced by a newer session) takes
//! the user offline again.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Extension, Router,
};
use courier_database::User;
use courier_messaging::{ConnectionHandle, PushEvent};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::state::GatewayState;

/// How many pushes may queue for a slow client before they are dropped
const PUSH_QUEUE_DEPTH: usize = 64;

/// Events clients send over the websocket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Come online and start receiving pushes
    Join,
    /// Heartbeat to keep the connection alive
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ControlEvent {
    Pong,
}

/// Create all WebSocket routes
pub fn create_websocket_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/ws", get(websocket_handler))
}

/// Upgrade handler. Authentication already ran in the middleware, so the
/// user is known before the upgrade completes.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState>>,
    Extension(user): Extension<User>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, user))
}

async fn handle_socket(socket: WebSocket, state: Arc<GatewayState>, user: User) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<PushEvent>(PUSH_QUEUE_DEPTH);
    let handle = ConnectionHandle::new(tx);
    let connection_id = handle.id();
    let mut joined = false;

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match serde_json::to_string(&event) {
                    Ok(text) => {
                        if sink.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    Err(error) => warn!(user_id = user.id, %error, "failed to encode push event"),
                }
            }
            incoming = stream.next() => {
                let Some(Ok(message)) = incoming else { break };
                match message {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(ClientEvent::Join) => {
                            if !joined {
                                state.presence.register(user.id, handle.clone()).await;
                                joined = true;
                            }
                        }
                        Ok(ClientEvent::Ping) => {
                            let Ok(pong) = serde_json::to_string(&ControlEvent::Pong) else {
                                continue;
                            };
                            if sink.send(Message::Text(pong)).await.is_err() {
                                break;
                            }
                        }
                        Err(error) => {
                            debug!(user_id = user.id, %error, "ignoring unknown client event");
                        }
                    },
                    Message::Close(_) => break,
                    // Protocol-level ping/pong is handled by axum.
                    _ => {}
                }
            }
        }
    }

    state.presence.unregister(connection_id).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_events_parse_from_tagged_json() {
        assert!(matches!(
            serde_json::from_str::<ClientEvent>(r#"{"type":"join"}"#).unwrap(),
            ClientEvent::Join
        ));
        assert!(matches!(
            serde_json::from_str::<ClientEvent>(r#"{"type":"ping"}"#).unwrap(),
            ClientEvent::Ping
        ));
        assert!(serde_json::from_str::<ClientEvent>(r#"{"type":"dance"}"#).is_err());
    }

    #[test]
    fn pong_is_tagged() {
        let text = serde_json::to_string(&ControlEvent::Pong).unwrap();
        assert_eq!(text, r#"{"type":"pong"}"#);
    }
}
