//! HTTP route handlers for the checkout.
//!
//! # Route Structure
//!
//! ```text
//! GET  /?orderId=..&accessToken=..               - Checkout entrypoint
//! GET  /api/order-facts?orderId=..&accessToken=.. - Order facts (JSON)
//! GET  /health                                    - Liveness check
//! ```

pub mod api;
pub mod checkout;

use axum::{Router, http::Uri, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/order-facts", get(api::order_facts))
}

/// Create all routes for the checkout.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Checkout entrypoint
        .route("/", get(checkout::entrypoint))
        .route("/health", get(health))
        .nest("/api", api_routes())
        .fallback(not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
