//! Review Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Review, ReviewCreate};
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const REVIEW_SELECT: &str =
    "SELECT id, product_id, user_id, name, rating, comment, created_at FROM review";

pub async fn find_for_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE product_id = ? ORDER BY created_at ASC, id ASC");
    let reviews = sqlx::query_as::<_, Review>(&sql)
        .bind(product_id)
        .fetch_all(pool)
        .await?;
    Ok(reviews)
}

/// Insert a review and recompute the product's aggregate rating, all within
/// one transaction. A failure at any step rolls back cleanly.
///
/// Checks run in order: `NotFound` when the product is absent, `Duplicate`
/// when the user already reviewed it (also backed by a unique index, so a
/// concurrent duplicate insert fails instead of slipping through), then
/// `Validation` on the rating. A repeat reviewer gets the duplicate error
/// whatever rating they send.
pub async fn add_review(
    pool: &SqlitePool,
    product_id: i64,
    user_id: i64,
    display_name: &str,
    data: ReviewCreate,
) -> RepoResult<Review> {
    let mut tx = pool.begin().await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM product WHERE id = ?")
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(RepoError::NotFound(format!(
            "Product {product_id} not found"
        )));
    }

    let already: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE product_id = ? AND user_id = ?")
            .bind(product_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
    if already > 0 {
        return Err(RepoError::Duplicate("Product already reviewed".into()));
    }

    if data.rating == 0 {
        return Err(RepoError::Validation("Please select a rating".into()));
    }
    if !(1..=5).contains(&data.rating) {
        return Err(RepoError::Validation("Rating must be between 1 and 5".into()));
    }

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO review (id, product_id, user_id, name, rating, comment, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(product_id)
    .bind(user_id)
    .bind(display_name)
    .bind(data.rating)
    .bind(&data.comment)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| match &e {
        // Unique index on (product_id, user_id): concurrent duplicate insert
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Duplicate("Product already reviewed".into())
        }
        _ => RepoError::from(e),
    })?;

    // Derived fields: count and arithmetic mean over all reviews
    sqlx::query(
        "UPDATE product SET \
            num_reviews = (SELECT COUNT(*) FROM review WHERE product_id = ?1), \
            rating = (SELECT AVG(rating) FROM review WHERE product_id = ?1) \
         WHERE id = ?1",
    )
    .bind(product_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let sql = format!("{REVIEW_SELECT} WHERE id = ?");
    sqlx::query_as::<_, Review>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create review".into()))
}
