//! Checkout entrypoint.
//!
//! The checkout is opened with `?orderId=..&accessToken=..`. A request
//! missing either parameter, or whose order cannot be loaded, renders the
//! same "no longer accessible" page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use checkout_core::{Checkout, OrderFacts, OrderReference};
use serde::Deserialize;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Language used when the order carries none.
const DEFAULT_LANG: &str = "en";

/// Query parameters identifying the order behind a checkout.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
}

impl CheckoutQuery {
    /// Build the order reference, rejecting missing or blank parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if either parameter is missing or blank.
    pub fn reference(&self) -> Result<OrderReference, checkout_core::ReferenceError> {
        OrderReference::from_params(self.order_id.as_deref(), self.access_token.as_deref())
    }
}

/// Page shown when the checkout cannot be opened.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/invalid.html")]
pub struct InvalidCheckoutTemplate {
    pub lang: String,
}

impl Default for InvalidCheckoutTemplate {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

/// Cart summary shown when the order loaded.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/summary.html")]
pub struct CheckoutSummaryTemplate {
    pub lang: String,
    pub summary_message: String,
    pub email_address: Option<String>,
    pub customer_complete: bool,
    pub facts: OrderFacts,
}

/// Format the cart summary line.
#[must_use]
pub fn cart_summary_message(item_count: u32) -> String {
    if item_count == 1 {
        "Your shopping cart contains 1 item".to_string()
    } else {
        format!("Your shopping cart contains {item_count} items")
    }
}

/// Checkout entrypoint handler.
///
/// Every unusable request renders the invalid page, including query strings
/// the extractor rejects (e.g. a repeated `orderId`).
#[instrument(skip(state, query))]
pub async fn entrypoint(
    State(state): State<AppState>,
    query: Result<Query<CheckoutQuery>, QueryRejection>,
) -> Response {
    // The rejection text is not logged: it may quote the access token.
    let Ok(Query(query)) = query else {
        tracing::debug!("Rejected malformed checkout query");
        return InvalidCheckoutTemplate::default().into_response();
    };

    let reference = match query.reference() {
        Ok(reference) => reference,
        Err(e) => {
            tracing::debug!(reason = %e, "Rejected checkout request");
            return InvalidCheckoutTemplate::default().into_response();
        }
    };

    add_breadcrumb(
        "checkout",
        "Opened checkout",
        Some(&[("order_id", reference.order_id().as_str())]),
    );

    let checkout = state.resolver().resolve_checkout(&reference).await;

    if !checkout.is_accessible() {
        return InvalidCheckoutTemplate::default().into_response();
    }

    let Checkout { facts, summary } = checkout;
    let summary = summary.unwrap_or_default();

    CheckoutSummaryTemplate {
        lang: summary
            .language_code
            .unwrap_or_else(|| DEFAULT_LANG.to_string()),
        summary_message: cart_summary_message(summary.skus_count),
        email_address: facts
            .has_email_address
            .then(|| facts.email_address.clone()),
        customer_complete: facts.has_email_address && facts.has_billing_address,
        facts,
    }
    .into_response()
}
