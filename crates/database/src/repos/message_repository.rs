//! Repository for message data access operations.

use crate::entities::{Message, MessageKind, NewDirectMessage, NewGroupMessage, UnreadCount};
use crate::types::{DomainError, DomainResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

const MESSAGE_SELECT: &str = "SELECT m.id, m.public_id, m.sender_id, s.public_id AS sender_public_id,
            m.receiver_id, r.public_id AS receiver_public_id,
            m.group_id, g.public_id AS group_public_id,
            m.content, m.kind, m.attachment_urls, m.read, m.created_at, m.updated_at
     FROM messages m
     JOIN users s ON s.id = m.sender_id
     LEFT JOIN users r ON r.id = m.receiver_id
     LEFT JOIN groups g ON g.id = m.group_id";

/// Repository for message database operations
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a direct message with read = false
    pub async fn create_direct(&self, request: &NewDirectMessage) -> DomainResult<Message> {
        let public_id = cuid2::create_id();
        let now = chrono::Utc::now().to_rfc3339();
        let urls = serde_json::to_string(&request.attachment_urls)?;

        sqlx::query(
            "INSERT INTO messages (public_id, sender_id, receiver_id, content, kind, attachment_urls, read, created_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(&public_id)
        .bind(request.sender_id)
        .bind(request.receiver_id)
        .bind(&request.content)
        .bind(request.kind.as_str())
        .bind(&urls)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(
            public_id = %public_id,
            sender_id = request.sender_id,
            receiver_id = request.receiver_id,
            kind = request.kind.as_str(),
            "created direct message"
        );

        self.require_by_public_id(&public_id).await
    }

    /// Persist a group message
    pub async fn create_group(&self, request: &NewGroupMessage) -> DomainResult<Message> {
        let public_id = cuid2::create_id();
        let now = chrono::Utc::now().to_rfc3339();
        let urls = serde_json::to_string(&request.attachment_urls)?;

        sqlx::query(
            "INSERT INTO messages (public_id, sender_id, group_id, content, kind, attachment_urls, read, created_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(&public_id)
        .bind(request.sender_id)
        .bind(request.group_id)
        .bind(&request.content)
        .bind(request.kind.as_str())
        .bind(&urls)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(
            public_id = %public_id,
            sender_id = request.sender_id,
            group_id = request.group_id,
            kind = request.kind.as_str(),
            "created group message"
        );

        self.require_by_public_id(&public_id).await
    }

    /// Find a message by its public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> DomainResult<Option<Message>> {
        let row = sqlx::query(&format!("{MESSAGE_SELECT} WHERE m.public_id = ?"))
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_message_row(&row)).transpose()
    }

    /// Both directions of a user pair, ascending timestamp
    pub async fn list_conversation(&self, user_a: i64, user_b: i64) -> DomainResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "{MESSAGE_SELECT}
             WHERE (m.sender_id = ? AND m.receiver_id = ?)
                OR (m.sender_id = ? AND m.receiver_id = ?)
             ORDER BY m.created_at ASC, m.id ASC"
        ))
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_message_row).collect()
    }

    /// All messages of a group, ascending timestamp. Membership is the
    /// caller's concern, not the store's.
    pub async fn list_group(&self, group_id: i64) -> DomainResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "{MESSAGE_SELECT} WHERE m.group_id = ? ORDER BY m.created_at ASC, m.id ASC"
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_message_row).collect()
    }

    /// Replace the content of a message. Only the sender may edit.
    pub async fn update_content(
        &self,
        public_id: &str,
        actor_id: i64,
        content: &str,
    ) -> DomainResult<Message> {
        let message = self
            .find_by_public_id(public_id)
            .await?
            .ok_or(DomainError::MessageNotFound)?;

        if message.sender_id != actor_id {
            return Err(DomainError::forbidden("only the sender may edit a message"));
        }

        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query("UPDATE messages SET content = ?, updated_at = ? WHERE public_id = ?")
            .bind(content)
            .bind(&now)
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        info!(public_id, edited_by = actor_id, "edited message");

        self.require_by_public_id(public_id).await
    }

    /// Delete a message. Only the sender may delete.
    pub async fn delete(&self, public_id: &str, actor_id: i64) -> DomainResult<()> {
        let message = self
            .find_by_public_id(public_id)
            .await?
            .ok_or(DomainError::MessageNotFound)?;

        if message.sender_id != actor_id {
            return Err(DomainError::forbidden(
                "only the sender may delete a message",
            ));
        }

        sqlx::query("DELETE FROM messages WHERE public_id = ?")
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        info!(public_id, deleted_by = actor_id, "deleted message");
        Ok(())
    }

    /// Mark every unread message from `sender_id` to `receiver_id` as
    /// read. Bulk and idempotent; returns the number of rows updated.
    pub async fn mark_read(&self, receiver_id: i64, sender_id: i64) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE messages SET read = 1
             WHERE sender_id = ? AND receiver_id = ? AND read = 0",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Unread direct messages addressed to `receiver_id`, grouped by sender
    pub async fn unread_counts(&self, receiver_id: i64) -> DomainResult<Vec<UnreadCount>> {
        let rows = sqlx::query(
            "SELECT s.public_id AS sender_public_id, COUNT(*) AS count
             FROM messages m
             JOIN users s ON s.id = m.sender_id
             WHERE m.receiver_id = ? AND m.read = 0
             GROUP BY m.sender_id
             ORDER BY s.public_id ASC",
        )
        .bind(receiver_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(UnreadCount {
                    sender_public_id: row.try_get("sender_public_id")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    async fn require_by_public_id(&self, public_id: &str) -> DomainResult<Message> {
        self.find_by_public_id(public_id)
            .await?
            .ok_or_else(|| DomainError::Database(format!("missing persisted message {public_id}")))
    }
}

fn map_message_row(row: &sqlx::sqlite::SqliteRow) -> DomainResult<Message> {
    let kind_str: String = row.try_get("kind")?;
    let urls_json: String = row.try_get("attachment_urls")?;

    Ok(Message {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        sender_id: row.try_get("sender_id")?,
        sender_public_id: row.try_get("sender_public_id")?,
        receiver_id: row.try_get("receiver_id")?,
        receiver_public_id: row.try_get("receiver_public_id")?,
        group_id: row.try_get("group_id")?,
        group_public_id: row.try_get("group_public_id")?,
        content: row.try_get("content")?,
        kind: MessageKind::from(kind_str.as_str()),
        attachment_urls: serde_json::from_str(&urls_json)?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
