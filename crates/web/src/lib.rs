//! Checkout web library.
//!
//! This crate provides the checkout service as a library, allowing it to be
//! tested and reused by the CLI.
//!
//! # Modules
//!
//! - [`provider`] - Order-data providers (Commerce Layer over HTTP)
//! - [`resolver`] - [`OrderFactsResolver`], the order-to-facts pipeline
//! - [`locale`] - Locale signal fired after an order loads
//! - [`routes`] - Checkout entrypoint and JSON facts endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod locale;
pub mod middleware;
pub mod provider;
pub mod resolver;
pub mod routes;
pub mod state;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use tower_http::trace::TraceLayer;

pub use resolver::{OrderFactsResolver, ResolveError};
pub use state::AppState;

/// Build the application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    // Spans record the path only: the query string carries the access token.
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = tracing::field::Empty,
        )
    });

    routes::routes()
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(trace_layer)
        .with_state(state)
}

/// Build the application router wrapped in the Sentry tower layers.
///
/// Each request runs on its own hub. Events and transactions carry the
/// request URL with the access token redacted.
pub fn instrumented_app(state: AppState) -> Router {
    app(state)
        .layer(axum::middleware::from_fn(middleware::redact_sentry_request))
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
        // Outermost, so the HTTP layer configures the request's own hub
        .layer(sentry_tower::NewSentryLayer::new_from_top())
}
