//! Product Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Product, ProductPage, ProductUpdate};
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Fixed catalog page size.
pub const PAGE_SIZE: i64 = 5;

/// Maximum number of products returned by the top-rated listing.
pub const TOP_RATED_LIMIT: i64 = 5;

const PRODUCT_SELECT: &str = "SELECT id, user_id, name, image, brand, category, description, price, count_in_stock, rating, num_reviews, created_at FROM product";

/// Search products by case-insensitive name substring, paginated.
///
/// Results are ordered by creation time ascending (id as tiebreak). `page`
/// below 1 clamps to the first page, beyond the end clamps to the last;
/// an empty result set still reports one page.
pub async fn search_page(pool: &SqlitePool, keyword: &str, page: i64) -> RepoResult<ProductPage> {
    let pattern = format!("%{keyword}%");

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE name LIKE ?")
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

    let pages = (total.max(0) + PAGE_SIZE - 1).div_euclid(PAGE_SIZE).max(1);
    let page = page.clamp(1, pages);
    let offset = (page - 1) * PAGE_SIZE;

    let sql = format!(
        "{PRODUCT_SELECT} WHERE name LIKE ? ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?"
    );
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(&pattern)
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(ProductPage {
        products,
        page,
        pages,
    })
}

/// Up to five products by rating descending; id ascending keeps ties stable
/// across repeated calls.
pub async fn top_rated(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} ORDER BY rating DESC, id ASC LIMIT ?");
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(TOP_RATED_LIMIT)
        .fetch_all(pool)
        .await?;
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

/// Insert the placeholder product owned by `user_id`. The caller is expected
/// to follow up with an update carrying real values.
pub async fn create_sample(pool: &SqlitePool, user_id: i64) -> RepoResult<Product> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO product (id, user_id, name, price, brand, count_in_stock, category, description, created_at) \
         VALUES (?, ?, 'Sample Name', 0, 'Sample Brand', 0, 'Sample Category', '', ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Overwrite the editable fields unconditionally.
pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let rows = sqlx::query(
        "UPDATE product SET name = ?, price = ?, brand = ?, count_in_stock = ?, category = ?, description = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(&data.brand)
    .bind(data.count_in_stock)
    .bind(&data.category)
    .bind(&data.description)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete. Reviews cascade; order items keep their snapshots with a
/// nulled product reference (schema policy).
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

/// Store an uploaded image reference on the product.
pub async fn set_image(pool: &SqlitePool, id: i64, image: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE product SET image = ? WHERE id = ?")
        .bind(image)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}
