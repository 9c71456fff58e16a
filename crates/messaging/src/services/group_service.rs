//! Group registry operations.

use courier_database::{
    DomainError, DomainResult, Group, GroupRepository, NewGroup, User, UserRepository,
};
use sqlx::SqlitePool;

pub struct GroupService {
    groups: GroupRepository,
    users: UserRepository,
}

impl GroupService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            groups: GroupRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    /// Creates a group. The creator joins implicitly; the final member set
    /// must contain at least two distinct users.
    pub async fn create_group(
        &self,
        creator: &User,
        name: &str,
        member_public_ids: &[String],
        avatar_url: Option<String>,
    ) -> DomainResult<Group> {
        let name = name.trim();
        if name.chars().count() < 2 {
            return Err(DomainError::validation(
                "group name must be at least 2 characters",
            ));
        }

        let mut requested: Vec<String> = member_public_ids.to_vec();
        requested.sort();
        requested.dedup();
        let mut member_ids = self.users.resolve_ids(&requested).await?;
        if member_ids.len() != requested.len() {
            return Err(DomainError::validation("unknown group member"));
        }
        if !member_ids.contains(&creator.id) {
            member_ids.push(creator.id);
        }
        if member_ids.len() < 2 {
            return Err(DomainError::validation(
                "a group needs at least 2 members",
            ));
        }

        self.groups
            .create(&NewGroup {
                name: name.to_string(),
                avatar_url,
                created_by: creator.id,
                member_ids,
            })
            .await
    }

    /// Groups the user belongs to.
    pub async fn list_for_user(&self, user: &User) -> DomainResult<Vec<Group>> {
        self.groups.list_for_user(user.id).await
    }

    /// Looks a group up by public id without a membership check.
    pub async fn find(&self, group_public_id: &str) -> DomainResult<Group> {
        self.groups
            .find_by_public_id(group_public_id)
            .await?
            .ok_or(DomainError::GroupNotFound)
    }
}
