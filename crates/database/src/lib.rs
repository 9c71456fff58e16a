//! Courier Database Crate
//!
//! This crate provides database functionality for the Courier chat
//! backend: connection management, migrations, entities, and the
//! repository implementations the messaging core builds on.

use sqlx::SqlitePool;

use courier_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{GroupRepository, MessageRepository, UserRepository};

// Re-export entities
pub use entities::{
    Group, Message, MessageKind, NewDirectMessage, NewGroup, NewGroupMessage, NewUser,
    UnreadCount, User,
};

// Re-export types
pub use types::{DomainError, DomainResult};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DomainResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(pool)
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::test_pool;

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let (pool, _temp_dir) = test_pool().await;

        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert!(result.0);
    }

    #[tokio::test]
    async fn test_message_recipient_check_constraint() {
        let (pool, _temp_dir) = test_pool().await;
        let user = test_support::seed_user(&pool, "alice").await;

        // Neither receiver nor group set is rejected by the schema
        let result = sqlx::query(
            "INSERT INTO messages (public_id, sender_id, content, created_at)
             VALUES ('bad', ?, 'x', '2024-01-01T00:00:00Z')",
        )
        .bind(user.id)
        .execute(&pool)
        .await;

        assert!(result.is_err());
    }
}
