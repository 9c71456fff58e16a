//! User entity definitions

use serde::{Deserialize, Serialize};

/// A known chat user. The authentication token backing the auth
/// collaborator lives in the `users` table but is never exposed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    /// Bearer token accepted for this user, if already issued.
    pub token: Option<String>,
}
