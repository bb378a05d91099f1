//! Order API Handlers
//!
//! Ownership rules differ per endpoint: a staff member may view any order
//! but may only pay their own.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OrderCreate, OrderDetail};
use crate::db::repository::order as order_repo;
use crate::utils::{AppError, AppResult};

/// POST /api/orders/add - place an order (authenticated)
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    if payload.order_items.is_empty() {
        return Err(AppError::validation("No order items"));
    }
    if let Some(item) = payload.order_items.iter().find(|i| i.qty < 1) {
        return Err(AppError::validation(format!(
            "Invalid quantity {} for product {}",
            item.qty, item.product
        )));
    }

    let detail = order_repo::create(state.get_db(), user.id, payload).await?;

    tracing::info!(
        order_id = detail.order.id,
        user_id = user.id,
        items = detail.order_items.len(),
        "Order placed"
    );
    Ok(Json(detail))
}

/// GET /api/orders/myorders - caller's own orders, newest first
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let orders = order_repo::find_by_user(state.get_db(), user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - single order, owner or staff
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order_repo::find_detail_by_id(state.get_db(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Order does not exist"))?;

    if detail.order.user_id != user.id && !user.is_staff {
        return Err(AppError::forbidden("Not authorized to view this order"));
    }

    Ok(Json(detail))
}

/// PUT /api/orders/{id}/pay - mark as paid, owner only
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<&'static str>> {
    let order = order_repo::find_by_id(state.get_db(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Order does not exist"))?;

    if order.user_id != user.id {
        return Err(AppError::forbidden("Not authorized to pay this order"));
    }

    order_repo::mark_paid(state.get_db(), id).await?;

    tracing::info!(order_id = id, user_id = user.id, "Order paid");
    Ok(Json("Order was paid"))
}
