//! Product Model

use serde::{Deserialize, Serialize};

/// Product record.
///
/// `rating` and `num_reviews` are derived from the review table and
/// recomputed whenever a review is added.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    /// Creating (owning) user
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Decremented on order placement; may go negative (no oversell guard).
    pub count_in_stock: i64,
    pub rating: f64,
    pub num_reviews: i64,
    pub created_at: i64,
}

/// Full-overwrite update payload. Every field is required; there are no
/// partial-update semantics on this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub price: f64,
    pub brand: String,
    pub count_in_stock: i64,
    pub category: String,
    pub description: String,
}

/// Paginated catalog listing envelope.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: i64,
    pub pages: i64,
}

/// Product with its reviews embedded, as served by the detail endpoint.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub reviews: Vec<crate::db::models::Review>,
}
