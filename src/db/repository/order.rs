//! Order Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate, OrderDetail, OrderItem, Product, ShippingAddress};
use crate::utils::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, user_id, payment_method, tax_price, shipping_price, total_price, is_paid, paid_at, created_at FROM orders";

/// Create an order with its shipping address and line items, decrementing
/// product stock, all within one transaction. A missing product aborts the
/// whole order and leaves no partial records.
///
/// Item name/price/image are snapshotted from the product row at order time.
/// Stock is decremented with no floor at zero: overselling drives
/// `count_in_stock` negative by policy.
pub async fn create(pool: &SqlitePool, user_id: i64, data: OrderCreate) -> RepoResult<OrderDetail> {
    let mut tx = pool.begin().await?;

    let order_id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO orders (id, user_id, payment_method, tax_price, shipping_price, total_price, is_paid, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, 0, ?)",
    )
    .bind(order_id)
    .bind(user_id)
    .bind(&data.payment_method)
    .bind(data.tax_price)
    .bind(data.shipping_price)
    .bind(data.total_price)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO shipping_address (id, order_id, address, city, postal_code, country) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(snowflake_id())
    .bind(order_id)
    .bind(&data.shipping_address.address)
    .bind(&data.shipping_address.city)
    .bind(&data.shipping_address.postal_code)
    .bind(&data.shipping_address.country)
    .execute(&mut *tx)
    .await?;

    for item in &data.order_items {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, user_id, name, image, brand, category, description, price, count_in_stock, rating, num_reviews, created_at \
             FROM product WHERE id = ?",
        )
        .bind(item.product)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", item.product)))?;

        sqlx::query(
            "INSERT INTO order_item (id, product_id, order_id, name, qty, price, image) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(product.id)
        .bind(order_id)
        .bind(&product.name)
        .bind(item.qty)
        .bind(product.price)
        .bind(&product.image)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE product SET count_in_stock = count_in_stock - ? WHERE id = ?")
            .bind(item.qty)
            .bind(product.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    find_detail_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Order with nested items and shipping address.
pub async fn find_detail_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    Ok(Some(load_detail(pool, order).await?))
}

/// All orders owned by a user, newest first, with nested data.
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<OrderDetail>> {
    let sql = format!("{ORDER_SELECT} WHERE user_id = ? ORDER BY created_at DESC, id DESC");
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    let mut details = Vec::with_capacity(orders.len());
    for order in orders {
        details.push(load_detail(pool, order).await?);
    }
    Ok(details)
}

async fn load_detail(pool: &SqlitePool, order: Order) -> RepoResult<OrderDetail> {
    let order_items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, product_id, order_id, name, qty, price, image FROM order_item WHERE order_id = ? ORDER BY id ASC",
    )
    .bind(order.id)
    .fetch_all(pool)
    .await?;

    let shipping_address = sqlx::query_as::<_, ShippingAddress>(
        "SELECT id, order_id, address, city, postal_code, country FROM shipping_address WHERE order_id = ?",
    )
    .bind(order.id)
    .fetch_optional(pool)
    .await?;

    Ok(OrderDetail {
        order,
        order_items,
        shipping_address,
    })
}

/// Flip the paid flag and stamp the payment time.
pub async fn mark_paid(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE orders SET is_paid = 1, paid_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}
