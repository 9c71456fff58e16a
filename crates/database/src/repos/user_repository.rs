//! Repository for user data access operations.

use crate::entities::{NewUser, User};
use crate::types::DomainResult;
use sqlx::{Row, SqlitePool};
use tracing::info;

const USER_COLUMNS: &str = "id, public_id, username, email, avatar_url, created_at";

/// Repository for user database operations
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: &NewUser) -> DomainResult<User> {
        let public_id = cuid2::create_id();
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (public_id, username, email, avatar_url, token, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.username)
        .bind(&request.email)
        .bind(&request.avatar_url)
        .bind(&request.token)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let user_id = result.last_insert_rowid();

        info!(user_id, public_id = %public_id, "created new user");

        Ok(User {
            id: user_id,
            public_id,
            username: request.username.clone(),
            email: request.email.clone(),
            avatar_url: request.avatar_url.clone(),
            created_at: now,
        })
    }

    /// Resolve a bearer token to the user it was issued for
    pub async fn find_by_token(&self, token: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_user_row(&row)).transpose()
    }

    /// Find a user by its public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE public_id = ?"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_user_row(&row)).transpose()
    }

    /// Resolve a set of public IDs to internal ids. Unknown public IDs
    /// are silently absent from the result; callers compare lengths to
    /// detect them.
    pub async fn resolve_ids(&self, public_ids: &[String]) -> DomainResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(public_ids.len());
        for public_id in public_ids {
            let row = sqlx::query("SELECT id FROM users WHERE public_id = ?")
                .bind(public_id)
                .fetch_optional(&self.pool)
                .await?;
            if let Some(row) = row {
                ids.push(row.try_get("id")?);
            }
        }
        Ok(ids)
    }

    /// List every user except the given one (the contact sidebar)
    pub async fn list_others(&self, user_id: i64) -> DomainResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id != ? ORDER BY username ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_user_row).collect()
    }
}

fn map_user_row(row: &sqlx::sqlite::SqliteRow) -> DomainResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        avatar_url: row.try_get("avatar_url")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    #[tokio::test]
    async fn test_create_and_find_by_token() {
        let (pool, _dir) = test_pool().await;
        let repo = UserRepository::new(pool);

        let user = repo
            .create(&NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                avatar_url: None,
                token: Some("alice-token".to_string()),
            })
            .await
            .unwrap();

        let found = repo.find_by_token("alice-token").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.username, "alice");

        assert!(repo.find_by_token("bogus").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_ids_skips_unknown() {
        let (pool, _dir) = test_pool().await;
        let repo = UserRepository::new(pool);

        let alice = repo
            .create(&NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                avatar_url: None,
                token: None,
            })
            .await
            .unwrap();

        let ids = repo
            .resolve_ids(&[alice.public_id.clone(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(ids, vec![alice.id]);
    }

    #[tokio::test]
    async fn test_list_others_excludes_self() {
        let (pool, _dir) = test_pool().await;
        let repo = UserRepository::new(pool);

        let alice = repo
            .create(&NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                avatar_url: None,
                token: None,
            })
            .await
            .unwrap();
        repo.create(&NewUser {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            avatar_url: None,
            token: None,
        })
        .await
        .unwrap();

        let others = repo.list_others(alice.id).await.unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].username, "bob");
    }
}
