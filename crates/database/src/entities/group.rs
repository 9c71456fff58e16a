//! Group entity definitions

use serde::{Deserialize, Serialize};

/// A chat group. Membership is fixed at creation and always includes
/// the creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_by: i64,
    pub created_by_public_id: String,
    pub member_public_ids: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_by: i64,
    /// Distinct member ids, creator included.
    pub member_ids: Vec<i64>,
}
