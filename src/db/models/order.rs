//! Order Models
//!
//! An order owns exactly one shipping address and zero or more order items.
//! Item name/price/image are snapshotted from the product at order time so
//! later catalog edits never rewrite order history.

use serde::{Deserialize, Serialize};

/// Order record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub payment_method: String,
    /// Caller-supplied; the server does not recompute money fields.
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub is_paid: bool,
    pub paid_at: Option<i64>,
    pub created_at: i64,
}

/// Order line item with product snapshot fields.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    /// Null once the referenced product has been deleted.
    pub product_id: Option<i64>,
    pub order_id: i64,
    pub name: String,
    pub qty: i64,
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

/// Shipping address, write-once at order creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ShippingAddress {
    pub id: i64,
    pub order_id: i64,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Create order payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub order_items: Vec<OrderItemCreate>,
    pub payment_method: String,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub shipping_address: ShippingAddressCreate,
}

/// Requested line item: a product reference plus quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemCreate {
    pub product: i64,
    pub qty: i64,
}

/// Shipping address payload nested in [`OrderCreate`].
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingAddressCreate {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Fully serialized order: the order row plus nested items and address.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: Option<ShippingAddress>,
}
