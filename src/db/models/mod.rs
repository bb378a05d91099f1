//! Database models and request/response payloads.

pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use order::{
    Order, OrderCreate, OrderDetail, OrderItem, OrderItemCreate, ShippingAddress,
    ShippingAddressCreate,
};
pub use product::{Product, ProductDetail, ProductPage, ProductUpdate};
pub use review::{Review, ReviewCreate};
pub use user::User;
