//! User Model

use serde::{Deserialize, Serialize};

/// User record. Credentials never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub is_staff: bool,
    pub created_at: i64,
}
