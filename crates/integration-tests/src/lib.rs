//! Integration tests for the checkout.
//!
//! The checkout router is wired to the real Commerce Layer provider, and the
//! commerce backend is replaced by a `wiremock` server replaying fixture
//! responses. No network access or credentials are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p checkout-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_entrypoint` - Rendered checkout pages
//! - `order_facts_api` - JSON facts endpoint
//! - `sentry_redaction` - Access tokens kept out of Sentry payloads

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use checkout_web::config::{CheckoutConfig, CommerceConfig};
use checkout_web::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Access token the fixtures are served for.
pub const ACCESS_TOKEN: &str = "fixture-access-token";

/// A checkout app talking to a stubbed commerce backend.
pub struct TestContext {
    pub backend: MockServer,
    pub app: Router,
}

impl TestContext {
    /// Start a stub backend and build the app against it.
    pub async fn new() -> Self {
        let backend = MockServer::start().await;
        let app = checkout_web::app(AppState::new(config_for(&backend)));

        Self { backend, app }
    }

    /// Like [`TestContext::new`], with the Sentry tower layers the binary uses.
    pub async fn instrumented() -> Self {
        let backend = MockServer::start().await;
        let app = checkout_web::instrumented_app(AppState::new(config_for(&backend)));

        Self { backend, app }
    }

    /// Serve `document` for `order_id` when requested with [`ACCESS_TOKEN`].
    pub async fn stub_order(&self, order_id: &str, document: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/orders/{order_id}")))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(document))
            .mount(&self.backend)
            .await;
    }

    /// Answer every backend request with `status` and an empty JSON body.
    pub async fn stub_status(&self, status: u16) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
            .mount(&self.backend)
            .await;
    }

    /// Send a GET request to the app and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Number of requests the backend received.
    pub async fn backend_requests(&self) -> usize {
        self.backend
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

/// Checkout configuration pointing at a stub backend.
fn config_for(backend: &MockServer) -> CheckoutConfig {
    CheckoutConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        commerce: CommerceConfig::new(&backend.uri(), Duration::from_secs(5)).unwrap(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Checkout URL for an order.
#[must_use]
pub fn checkout_url(order_id: &str, access_token: &str) -> String {
    format!("/?accessToken={access_token}&orderId={order_id}")
}

// =============================================================================
// Fixtures
// =============================================================================

/// Draft guest order with two SKU line items and no customer.
#[must_use]
pub fn draft_guest_order(order_id: &str) -> Value {
    json!({
        "data": {
            "id": order_id,
            "type": "orders",
            "attributes": {
                "status": "draft",
                "guest": true,
                "customer_email": "alessani@gmail.com",
                "language_code": "en",
                "skus_count": 2
            },
            "relationships": {
                "shipping_address": { "data": null },
                "billing_address": { "data": null },
                "shipments": { "data": [] },
                "payment_method": { "data": null },
                "customer": { "data": null }
            }
        },
        "included": []
    })
}

/// Placed order of a registered customer shipping to a saved address and
/// billing to a new one.
#[must_use]
pub fn registered_order(order_id: &str) -> Value {
    json!({
        "data": {
            "id": order_id,
            "type": "orders",
            "attributes": {
                "status": "pending",
                "guest": false,
                "customer_email": "ada@example.com",
                "language_code": "it",
                "skus_count": 1
            },
            "relationships": {
                "shipping_address": { "data": { "type": "addresses", "id": "addr-ship" } },
                "billing_address": { "data": { "type": "addresses", "id": "addr-bill" } },
                "shipments": { "data": [{ "type": "shipments", "id": "ship-1" }] },
                "payment_method": { "data": { "type": "payment_methods", "id": "pm-1" } },
                "customer": { "data": { "type": "customers", "id": "cust-1" } }
            }
        },
        "included": [
            {
                "id": "addr-ship",
                "type": "addresses",
                "attributes": { "name": "Ada Lovelace", "city": "London", "country_code": "GB" }
            },
            {
                "id": "addr-bill",
                "type": "addresses",
                "attributes": { "name": "Analytical Engines Ltd", "city": "London", "country_code": "GB" }
            },
            { "id": "ship-1", "type": "shipments", "attributes": { "status": "upcoming" } },
            {
                "id": "pm-1",
                "type": "payment_methods",
                "attributes": { "name": "Stripe", "payment_source_type": "stripe_payments" }
            },
            {
                "id": "cust-1",
                "type": "customers",
                "attributes": { "email": "ada@example.com" },
                "relationships": {
                    "customer_addresses": {
                        "data": [{ "type": "customer_addresses", "id": "ca-1" }]
                    }
                }
            },
            { "id": "ca-1", "type": "customer_addresses", "attributes": { "name": "Ada Lovelace" } }
        ]
    })
}
