//! Order-data providers.
//!
//! # Architecture
//!
//! - [`OrderProvider`] is the seam between the resolver and the commerce
//!   backend. Implementations load one order with every facet the checkout
//!   needs (shipping address, billing address, shipments, payment method,
//!   customer address book) in a single logical fetch.
//! - Providers hold no credentials. Each call receives a [`ProviderSession`]
//!   with the endpoint and the access token of that checkout, so concurrent
//!   checkouts never share authentication state.
//! - Nothing is cached: every fetch reflects the backend's current state.

mod commerce_layer;

pub use commerce_layer::CommerceLayerProvider;

use async_trait::async_trait;
use checkout_core::{AccessToken, OrderId, OrderSnapshot};
use thiserror::Error;
use url::Url;

/// Errors that can occur when loading an order from a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The access token was rejected.
    #[error("Unauthorized: access token rejected")]
    Unauthorized,

    /// The order does not exist or is not visible with this token.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The backend answered with an unexpected status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but does not describe a complete order.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The endpoint cannot be used to build request URLs.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Endpoint and credential for one order fetch.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    endpoint: Url,
    access_token: AccessToken,
}

impl ProviderSession {
    /// Create a session for a single checkout.
    #[must_use]
    pub const fn new(endpoint: Url, access_token: AccessToken) -> Self {
        Self {
            endpoint,
            access_token,
        }
    }

    /// Base URL of the backend.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Access token for this checkout.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}

/// Source of order snapshots.
#[async_trait]
pub trait OrderProvider: Send + Sync {
    /// Load an order with all checkout facets.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be loaded completely. Partial
    /// results are never returned.
    async fn fetch_order(
        &self,
        session: &ProviderSession,
        order_id: &OrderId,
    ) -> Result<OrderSnapshot, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::NotFound("wRPpheqxyZ".to_string());
        assert_eq!(err.to_string(), "Not found: wRPpheqxyZ");

        let err = ProviderError::Status {
            status: 500,
            body: "{}".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: {}");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ProviderError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
