//! Orders API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/add", post(handler::add))
        .route("/myorders", get(handler::my_orders))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pay", put(handler::pay))
}
