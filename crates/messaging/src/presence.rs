//! In-memory registry of connected users.
//!
//! Each live websocket session owns a [`ConnectionHandle`]; the registry maps
//! internal user ids to the handle of their most recent session. A user opening
//! a second session displaces the first entry, so pushes always target the
//! newest connection.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::events::PushEvent;

/// Sending half of a live websocket session.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    sender: mpsc::Sender<PushEvent>,
}

impl ConnectionHandle {
    pub fn new(sender: mpsc::Sender<PushEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queues an event without waiting. Errors when the session's queue is
    /// full or its receiving task has gone away.
    pub fn try_push(&self, event: PushEvent) -> Result<(), mpsc::error::TrySendError<PushEvent>> {
        self.sender.try_send(event)
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    connections: Arc<RwLock<HashMap<i64, ConnectionHandle>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `user_id` to `handle`, displacing any previous session.
    pub async fn register(&self, user_id: i64, handle: ConnectionHandle) {
        let mut connections = self.connections.write().await;
        if let Some(previous) = connections.insert(user_id, handle) {
            tracing::debug!(user_id, connection_id = %previous.id(), "displaced earlier session");
        }
        tracing::info!(user_id, "user connected");
    }

    /// Removes the entry owned by `connection_id`, if it is still current.
    /// A handle displaced by a newer session leaves the registry untouched.
    pub async fn unregister(&self, connection_id: Uuid) {
        let mut connections = self.connections.write().await;
        let owner = connections
            .iter()
            .find(|(_, handle)| handle.id() == connection_id)
            .map(|(user_id, _)| *user_id);
        if let Some(user_id) = owner {
            connections.remove(&user_id);
            tracing::info!(user_id, "user disconnected");
        }
    }

    pub async fn lookup(&self, user_id: i64) -> Option<ConnectionHandle> {
        self.connections.read().await.get(&user_id).cloned()
    }

    pub async fn online_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> (ConnectionHandle, mpsc::Receiver<PushEvent>) {
        let (tx, rx) = mpsc::channel(4);
        (ConnectionHandle::new(tx), rx)
    }

    #[tokio::test]
    async fn register_and_lookup() {
        let registry = PresenceRegistry::new();
        let (first, _rx) = handle();

        registry.register(7, first.clone()).await;

        let found = registry.lookup(7).await.unwrap();
        assert_eq!(found, first);
        assert!(registry.lookup(8).await.is_none());
    }

    #[tokio::test]
    async fn newer_session_displaces_older() {
        let registry = PresenceRegistry::new();
        let (first, _rx1) = handle();
        let (second, _rx2) = handle();

        registry.register(7, first.clone()).await;
        registry.register(7, second.clone()).await;

        assert_eq!(registry.lookup(7).await.unwrap(), second);
        assert_eq!(registry.online_count().await, 1);
    }

    #[tokio::test]
    async fn stale_unregister_keeps_current_session() {
        let registry = PresenceRegistry::new();
        let (first, _rx1) = handle();
        let (second, _rx2) = handle();

        registry.register(7, first.clone()).await;
        registry.register(7, second.clone()).await;
        registry.unregister(first.id()).await;

        assert_eq!(registry.lookup(7).await.unwrap(), second);
    }

    #[tokio::test]
    async fn unregister_removes_current_session() {
        let registry = PresenceRegistry::new();
        let (first, _rx) = handle();

        registry.register(7, first.clone()).await;
        registry.unregister(first.id()).await;

        assert!(registry.lookup(7).await.is_none());
        assert_eq!(registry.online_count().await, 0);
    }
}
