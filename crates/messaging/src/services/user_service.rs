//! User lookup and token authentication.

use courier_database::{DomainError, DomainResult, User, UserRepository};
use sqlx::SqlitePool;

pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Resolves a bearer token to its user, rejecting unknown tokens.
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        self.users
            .find_by_token(token)
            .await?
            .ok_or(DomainError::Unauthorized)
    }

    /// Every user except the caller, for the contact sidebar.
    pub async fn list_contacts(&self, actor: &User) -> DomainResult<Vec<User>> {
        self.users.list_others(actor.id).await
    }
}
