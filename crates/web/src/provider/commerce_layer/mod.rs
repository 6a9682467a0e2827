//! Commerce Layer order provider.
//!
//! Loads an order from the Commerce Layer REST API (JSON:API) with every
//! checkout facet sideloaded through `include`, so one request is enough
//! to compute the checkout facts.

mod document;

use async_trait::async_trait;
use checkout_core::{OrderId, OrderSnapshot};
use reqwest::header::{ACCEPT, RETRY_AFTER};
use tracing::{debug, instrument};
use url::Url;

use crate::provider::{OrderProvider, ProviderError, ProviderSession};

use document::{Document, convert_order};

/// JSON:API media type.
const JSON_API: &str = "application/vnd.api+json";

/// Relationships sideloaded with the order.
const ORDER_INCLUDES: &str =
    "shipping_address,billing_address,shipments,payment_method,customer.customer_addresses";

/// Order provider backed by the Commerce Layer API.
///
/// Holds only an HTTP connection pool; the endpoint and access token come
/// with each [`ProviderSession`].
#[derive(Clone, Default)]
pub struct CommerceLayerProvider {
    client: reqwest::Client,
}

impl CommerceLayerProvider {
    /// Create a provider with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider sharing an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build `{endpoint}/api/orders/{id}?include=...`.
    fn order_url(endpoint: &Url, order_id: &OrderId) -> Result<Url, ProviderError> {
        let mut url = endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::InvalidEndpoint(endpoint.to_string()))?
            .pop_if_empty()
            .extend(["api", "orders", order_id.as_str()]);
        url.query_pairs_mut()
            .clear()
            .append_pair("include", ORDER_INCLUDES);
        Ok(url)
    }
}

#[async_trait]
impl OrderProvider for CommerceLayerProvider {
    #[instrument(skip(self, session), fields(order_id = %order_id))]
    async fn fetch_order(
        &self,
        session: &ProviderSession,
        order_id: &OrderId,
    ) -> Result<OrderSnapshot, ProviderError> {
        let url = Self::order_url(session.endpoint(), order_id)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(session.access_token().expose())
            .header(ACCEPT, JSON_API)
            .send()
            .await?;

        let status = response.status();

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                return Err(ProviderError::Unauthorized);
            }
            reqwest::StatusCode::NOT_FOUND => {
                return Err(ProviderError::NotFound(order_id.to_string()));
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(1);
                return Err(ProviderError::RateLimited(retry_after));
            }
            _ => {}
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Commerce API returned non-success status"
            );
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        let document: Document = match serde_json::from_str(&response_text) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Commerce API order document"
                );
                return Err(ProviderError::Parse(e));
            }
        };

        let snapshot = convert_order(&document)?;
        debug!(
            guest = snapshot.is_guest(),
            shipments = snapshot.shipments.len(),
            "Loaded order"
        );
        Ok(snapshot)
    }
}
