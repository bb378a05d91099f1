//! Review Model

use serde::{Deserialize, Serialize};

/// Review record. `name` is the reviewer's first name snapshotted at
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    pub name: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    pub created_at: i64,
}

/// Create review payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreate {
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}
