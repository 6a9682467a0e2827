//! JSON facts endpoint.
//!
//! Returns the [`OrderFacts`] of an order. Loading failures are not errors
//! here: the response is then the fallback facts, still with `200 OK`.

use axum::{
    Json,
    extract::{Query, State},
};
use checkout_core::OrderFacts;
use tracing::instrument;

use crate::error::Result;
use crate::routes::checkout::CheckoutQuery;
use crate::state::AppState;

/// `GET /api/order-facts?orderId=..&accessToken=..`
#[instrument(skip(state, query))]
pub async fn order_facts(
    State(state): State<AppState>,
    Query(query): Query<CheckoutQuery>,
) -> Result<Json<OrderFacts>> {
    let reference = query.reference()?;
    Ok(Json(state.resolver().resolve(&reference).await))
}
