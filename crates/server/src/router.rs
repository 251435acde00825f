//! Route table.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{handlers, state::AppState};

/// Builds the service router.
///
/// CORS is wide open: badges and the JSON API are meant to be embedded anywhere.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/badge/{name}", get(handlers::badge))
        .route("/history/{name}", get(handlers::history))
        .route("/donate/{name}", get(handlers::donate))
        .route("/api/donations/{name}", get(handlers::donations))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
