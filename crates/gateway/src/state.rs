//! Shared application state for the gateway

use std::sync::Arc;

use courier_config::AppConfig;
use courier_database::initialize_database;
use courier_messaging::{
    DeliveryDispatcher, GroupService, LocalMediaStore, MessageService, PresenceRegistry,
    UserService,
};
use sqlx::SqlitePool;

use crate::error::{GatewayError, GatewayResult};

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Who is connected right now
    pub presence: PresenceRegistry,
    /// User lookup and token authentication
    pub user_service: Arc<UserService>,
    /// Message lifecycle and delivery
    pub message_service: Arc<MessageService>,
    /// Group registry
    pub group_service: Arc<GroupService>,
    /// Upload storage
    pub media_store: Arc<LocalMediaStore>,
}

impl GatewayState {
    /// Create a new gateway state with all services wired to the pool
    pub fn new(pool: SqlitePool, media_store: LocalMediaStore) -> Self {
        let presence = PresenceRegistry::new();
        let dispatcher = DeliveryDispatcher::new(presence.clone());

        Self {
            presence,
            user_service: Arc::new(UserService::new(pool.clone())),
            message_service: Arc::new(MessageService::new(pool.clone(), dispatcher)),
            group_service: Arc::new(GroupService::new(pool.clone())),
            media_store: Arc::new(media_store),
            pool,
        }
    }

    /// Create gateway state from application configuration
    pub async fn from_config(config: &AppConfig) -> GatewayResult<Self> {
        let pool = initialize_database(&config.database)
            .await
            .map_err(|e| GatewayError::InternalError(format!("database init failed: {}", e)))?;
        Ok(Self::new(pool, LocalMediaStore::new(&config.media)))
    }
}
