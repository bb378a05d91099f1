//! User Repository

use super::{RepoError, RepoResult};
use crate::db::models::User;
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, username, password_hash, first_name, is_staff, created_at FROM user";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a user with an already-hashed password. Provisioning is out of
/// band (ops tooling and tests); there is no registration endpoint.
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    first_name: &str,
    is_staff: bool,
) -> RepoResult<User> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO user (id, username, password_hash, first_name, is_staff, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(first_name)
    .bind(is_staff)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Duplicate(format!("User {username} already exists"))
        }
        _ => RepoError::from(e),
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
