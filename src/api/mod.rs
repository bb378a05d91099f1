//! API routing
//!
//! # Structure
//!
//! - [`auth`] - login endpoint
//! - [`products`] - catalog, reviews, image upload
//! - [`orders`] - order placement, lookup, payment

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod auth;
pub mod orders;
pub mod products;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(orders::router())
}

/// Build the fully configured application with middleware and state.
///
/// Used by both the HTTP server and the integration tests.
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Gzip compress responses
        .layer(CompressionLayer::new())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(ConcurrencyLimitLayer::new(1024))
        // Image uploads exceed axum's 2MB default
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        // Unique ID per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
