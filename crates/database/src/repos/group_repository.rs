//! Repository for group data access operations.

use crate::entities::{Group, NewGroup};
use crate::types::{DomainError, DomainResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for group database operations
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    /// Create a new group repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a group with its membership rows in one transaction
    pub async fn create(&self, request: &NewGroup) -> DomainResult<Group> {
        let public_id = cuid2::create_id();
        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO groups (public_id, name, avatar_url, created_by, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.avatar_url)
        .bind(request.created_by)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let group_id = result.last_insert_rowid();

        for member_id in &request.member_ids {
            sqlx::query(
                "INSERT INTO group_members (group_id, user_id, joined_at) VALUES (?, ?, ?)",
            )
            .bind(group_id)
            .bind(member_id)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            group_id,
            public_id = %public_id,
            members = request.member_ids.len(),
            created_by = request.created_by,
            "created group"
        );

        self.require_by_public_id(&public_id).await
    }

    /// Find a group by its public ID, members included
    pub async fn find_by_public_id(&self, public_id: &str) -> DomainResult<Option<Group>> {
        let row = sqlx::query(
            "SELECT g.id, g.public_id, g.name, g.avatar_url, g.created_by,
                    u.public_id AS created_by_public_id, g.created_at
             FROM groups g
             JOIN users u ON u.id = g.created_by
             WHERE g.public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let group_id: i64 = row.try_get("id")?;
        let member_public_ids = self.member_public_ids(group_id).await?;

        Ok(Some(Group {
            id: group_id,
            public_id: row.try_get("public_id")?,
            name: row.try_get("name")?,
            avatar_url: row.try_get("avatar_url")?,
            created_by: row.try_get("created_by")?,
            created_by_public_id: row.try_get("created_by_public_id")?,
            member_public_ids,
            created_at: row.try_get("created_at")?,
        }))
    }

    /// All groups whose member set contains the user
    pub async fn list_for_user(&self, user_id: i64) -> DomainResult<Vec<Group>> {
        let rows = sqlx::query(
            "SELECT g.public_id
             FROM groups g
             JOIN group_members gm ON gm.group_id = g.id
             WHERE gm.user_id = ?
             ORDER BY g.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            let public_id: String = row.try_get("public_id")?;
            groups.push(self.require_by_public_id(&public_id).await?);
        }
        Ok(groups)
    }

    /// Whether a user belongs to a group
    pub async fn is_member(&self, group_id: i64, user_id: i64) -> DomainResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM group_members WHERE group_id = ? AND user_id = ?",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    /// Internal member ids, used for fan-out
    pub async fn member_ids(&self, group_id: i64) -> DomainResult<Vec<i64>> {
        let rows = sqlx::query(
            "SELECT user_id FROM group_members WHERE group_id = ? ORDER BY user_id ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Ok(row.try_get("user_id")?))
            .collect()
    }

    async fn member_public_ids(&self, group_id: i64) -> DomainResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT u.public_id
             FROM group_members gm
             JOIN users u ON u.id = gm.user_id
             WHERE gm.group_id = ?
             ORDER BY u.public_id ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Ok(row.try_get("public_id")?))
            .collect()
    }

    async fn require_by_public_id(&self, public_id: &str) -> DomainResult<Group> {
        self.find_by_public_id(public_id)
            .await?
            .ok_or(DomainError::GroupNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, test_pool};

    #[tokio::test]
    async fn test_create_group_with_members() {
        let (pool, _dir) = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let repo = GroupRepository::new(pool);

        let group = repo
            .create(&NewGroup {
                name: "weekend plans".to_string(),
                avatar_url: None,
                created_by: alice.id,
                member_ids: vec![alice.id, bob.id],
            })
            .await
            .unwrap();

        assert!(group.id > 0);
        assert_eq!(group.name, "weekend plans");
        assert_eq!(group.created_by_public_id, alice.public_id);
        assert_eq!(group.member_public_ids.len(), 2);
        assert!(group.member_public_ids.contains(&bob.public_id));
    }

    #[tokio::test]
    async fn test_membership_checks() {
        let (pool, _dir) = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let carol = seed_user(&pool, "carol").await;
        let repo = GroupRepository::new(pool);

        let group = repo
            .create(&NewGroup {
                name: "pair".to_string(),
                avatar_url: None,
                created_by: alice.id,
                member_ids: vec![alice.id, bob.id],
            })
            .await
            .unwrap();

        assert!(repo.is_member(group.id, alice.id).await.unwrap());
        assert!(repo.is_member(group.id, bob.id).await.unwrap());
        assert!(!repo.is_member(group.id, carol.id).await.unwrap());

        assert_eq!(repo.member_ids(group.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let (pool, _dir) = test_pool().await;
        let alice = seed_user(&pool, "alice").await;
        let bob = seed_user(&pool, "bob").await;
        let carol = seed_user(&pool, "carol").await;
        let repo = GroupRepository::new(pool);

        repo.create(&NewGroup {
            name: "alice and bob".to_string(),
            avatar_url: None,
            created_by: alice.id,
            member_ids: vec![alice.id, bob.id],
        })
        .await
        .unwrap();
        repo.create(&NewGroup {
            name: "bob and carol".to_string(),
            avatar_url: None,
            created_by: bob.id,
            member_ids: vec![bob.id, carol.id],
        })
        .await
        .unwrap();

        let alice_groups = repo.list_for_user(alice.id).await.unwrap();
        assert_eq!(alice_groups.len(), 1);
        assert_eq!(alice_groups[0].name, "alice and bob");

        let bob_groups = repo.list_for_user(bob.id).await.unwrap();
        assert_eq!(bob_groups.len(), 2);
    }
}
