//! Order facts resolution.
//!
//! [`OrderFactsResolver`] loads an order through an [`OrderProvider`] and
//! turns it into the [`OrderFacts`] the checkout branches on.
//!
//! # Failure policy
//!
//! - [`OrderFactsResolver::try_resolve`] reports failures as [`ResolveError`].
//! - [`OrderFactsResolver::resolve_checkout`] and [`OrderFactsResolver::resolve`]
//!   never fail: errors are logged and collapsed into the fallback facts, so
//!   the rendering layer only has to ask whether the facts look accessible.
//!
//! There are no retries. One failed fetch yields the fallback.

use std::sync::Arc;
use std::time::Duration;

use checkout_core::{Checkout, OrderFacts, OrderReference};
use thiserror::Error;
use tracing::instrument;

use crate::config::CommerceConfig;
use crate::locale::LocaleSwitch;
use crate::provider::{OrderProvider, ProviderError, ProviderSession};

/// Errors that can occur while resolving an order.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The provider could not load the order.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Loading the order took longer than the configured timeout.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolves order references into checkout facts.
///
/// Cheaply cloneable via `Arc`. Holds no per-order state: each call builds
/// its own [`ProviderSession`] from the reference's access token.
#[derive(Clone)]
pub struct OrderFactsResolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    commerce: CommerceConfig,
    provider: Arc<dyn OrderProvider>,
    locale: Arc<dyn LocaleSwitch>,
}

impl OrderFactsResolver {
    /// Create a resolver.
    #[must_use]
    pub fn new(
        commerce: CommerceConfig,
        provider: Arc<dyn OrderProvider>,
        locale: Arc<dyn LocaleSwitch>,
    ) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                commerce,
                provider,
                locale,
            }),
        }
    }

    /// Load the order and derive its checkout.
    ///
    /// On success the order language is signalled to the locale switch.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails or the timeout elapses.
    #[instrument(skip(self, reference), fields(order_id = %reference.order_id()))]
    pub async fn try_resolve(&self, reference: &OrderReference) -> Result<Checkout, ResolveError> {
        let session = ProviderSession::new(
            self.inner.commerce.endpoint.clone(),
            reference.access_token().clone(),
        );
        let timeout = self.inner.commerce.timeout;

        let snapshot = tokio::time::timeout(
            timeout,
            self.inner
                .provider
                .fetch_order(&session, reference.order_id()),
        )
        .await
        .map_err(|_| ResolveError::Timeout(timeout))??;

        let checkout = Checkout::from_snapshot(&snapshot);

        if let Some(code) = snapshot.language_code.as_deref() {
            self.signal_locale(code);
        }

        Ok(checkout)
    }

    /// Load the order and derive its checkout, falling back on failure.
    pub async fn resolve_checkout(&self, reference: &OrderReference) -> Checkout {
        match self.try_resolve(reference).await {
            Ok(checkout) => checkout,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    order_id = %reference.order_id(),
                    "Error on retrieving order"
                );
                Checkout::fallback()
            }
        }
    }

    /// Load the order and derive its facts, falling back on failure.
    pub async fn resolve(&self, reference: &OrderReference) -> OrderFacts {
        self.resolve_checkout(reference).await.facts
    }

    fn signal_locale(&self, code: &str) {
        if let Err(e) = self.inner.locale.switch_language(code) {
            tracing::warn!(error = %e, locale = %code, "Locale switch failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use checkout_core::{Address, Customer, CustomerId, OrderId, OrderSnapshot};

    use super::*;
    use crate::locale::LocaleError;

    /// Provider serving one snapshot per order id; unknown ids fail with 500.
    #[derive(Default)]
    struct FakeProvider {
        orders: Vec<OrderSnapshot>,
        delay: Option<Duration>,
        seen_tokens: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl OrderProvider for FakeProvider {
        async fn fetch_order(
            &self,
            session: &ProviderSession,
            order_id: &OrderId,
        ) -> Result<OrderSnapshot, ProviderError> {
            self.seen_tokens.lock().unwrap().push((
                order_id.to_string(),
                session.access_token().expose().to_string(),
            ));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.orders
                .iter()
                .find(|o| &o.id == order_id)
                .cloned()
                .ok_or(ProviderError::Status {
                    status: 500,
                    body: "{}".to_string(),
                })
        }
    }

    #[derive(Default)]
    struct RecordingLocale {
        codes: Mutex<Vec<String>>,
    }

    impl LocaleSwitch for RecordingLocale {
        fn switch_language(&self, code: &str) -> Result<(), LocaleError> {
            self.codes.lock().unwrap().push(code.to_string());
            Ok(())
        }
    }

    struct FailingLocale;

    impl LocaleSwitch for FailingLocale {
        fn switch_language(&self, _code: &str) -> Result<(), LocaleError> {
            Err(LocaleError::Unavailable("catalogue missing".to_string()))
        }
    }

    fn draft_order(id: &str, email: &str) -> OrderSnapshot {
        OrderSnapshot {
            id: OrderId::new(id),
            customer_email: Some(email.to_string()),
            language_code: Some("en".to_string()),
            skus_count: 2,
            shipping_address: None,
            billing_address: None,
            shipments: Vec::new(),
            payment_method: None,
            customer: None,
        }
    }

    fn commerce(timeout: Duration) -> CommerceConfig {
        CommerceConfig::new("https://acme.commercelayer.io", timeout).unwrap()
    }

    fn resolver(provider: Arc<FakeProvider>, locale: Arc<dyn LocaleSwitch>) -> OrderFactsResolver {
        OrderFactsResolver::new(commerce(Duration::from_secs(5)), provider, locale)
    }

    fn reference(order_id: &str, token: &str) -> OrderReference {
        OrderReference::new(order_id, token).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_guest_draft_order() {
        let provider = Arc::new(FakeProvider {
            orders: vec![draft_order("wRPpheqxyZ", "alessani@gmail.com")],
            ..FakeProvider::default()
        });
        let locale = Arc::new(RecordingLocale::default());
        let resolver = resolver(provider, locale.clone());

        let checkout = resolver
            .try_resolve(&reference("wRPpheqxyZ", "token"))
            .await
            .unwrap();

        assert!(checkout.facts.is_guest);
        assert!(checkout.facts.has_email_address);
        assert_eq!(checkout.facts.email_address, "alessani@gmail.com");
        assert!(checkout.facts.is_using_new_shipping_address);
        assert!(checkout.facts.is_using_new_billing_address);
        assert_eq!(checkout.summary.unwrap().skus_count, 2);
        assert_eq!(*locale.codes.lock().unwrap(), vec!["en".to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_provider_failure_yields_fallback() {
        let provider = Arc::new(FakeProvider::default());
        let locale = Arc::new(RecordingLocale::default());
        let resolver = resolver(provider, locale.clone());

        let reference = reference("wrongOrderId", "wrongAccessToken");
        assert!(matches!(
            resolver.try_resolve(&reference).await,
            Err(ResolveError::Provider(ProviderError::Status { status: 500, .. }))
        ));
        assert_eq!(resolver.resolve(&reference).await, OrderFacts::fallback());
        assert!(locale.codes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_timeout_yields_fallback() {
        let provider = Arc::new(FakeProvider {
            orders: vec![draft_order("slow", "slow@example.com")],
            delay: Some(Duration::from_secs(5)),
            ..FakeProvider::default()
        });
        let resolver = OrderFactsResolver::new(
            commerce(Duration::from_millis(20)),
            provider,
            Arc::new(RecordingLocale::default()),
        );

        let reference = reference("slow", "token");
        assert!(matches!(
            resolver.try_resolve(&reference).await,
            Err(ResolveError::Timeout(_))
        ));
        assert_eq!(resolver.resolve_checkout(&reference).await, Checkout::fallback());
    }

    #[tokio::test]
    async fn test_locale_failure_does_not_affect_facts() {
        let provider = Arc::new(FakeProvider {
            orders: vec![draft_order("order-1", "ada@example.com")],
            ..FakeProvider::default()
        });
        let resolver = resolver(provider, Arc::new(FailingLocale));

        let facts = resolver.resolve(&reference("order-1", "token")).await;
        assert!(facts.is_guest);
        assert_eq!(facts.email_address, "ada@example.com");
    }

    #[tokio::test]
    async fn test_resolve_registered_customer() {
        let mut order = draft_order("order-1", "ada@example.com");
        order.shipping_address = Some(Address::named("Home"));
        order.billing_address = Some(Address::named("Office"));
        order.customer = Some(Customer {
            id: CustomerId::new("cust-1"),
            email: Some("ada@example.com".to_string()),
            address_book: ["Home"].into_iter().map(Address::named).collect(),
        });
        let provider = Arc::new(FakeProvider {
            orders: vec![order],
            ..FakeProvider::default()
        });
        let resolver = resolver(provider, Arc::new(RecordingLocale::default()));

        let facts = resolver.resolve(&reference("order-1", "token")).await;
        assert!(!facts.is_guest);
        assert!(!facts.is_using_new_shipping_address);
        assert!(facts.is_using_new_billing_address);
        assert!(!facts.has_same_addresses);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let provider = Arc::new(FakeProvider {
            orders: vec![draft_order("order-1", "ada@example.com")],
            ..FakeProvider::default()
        });
        let resolver = resolver(provider, Arc::new(RecordingLocale::default()));
        let reference = reference("order-1", "token");

        let first = resolver.resolve(&reference).await;
        let second = resolver.resolve(&reference).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_resolutions_keep_their_tokens() {
        let provider = Arc::new(FakeProvider {
            orders: vec![
                draft_order("order-a", "a@example.com"),
                draft_order("order-b", "b@example.com"),
            ],
            delay: Some(Duration::from_millis(10)),
            ..FakeProvider::default()
        });
        let resolver = resolver(provider.clone(), Arc::new(RecordingLocale::default()));

        let ref_a = reference("order-a", "token-a");
        let ref_b = reference("order-b", "token-b");
        let (a, b) = tokio::join!(resolver.resolve(&ref_a), resolver.resolve(&ref_b));

        assert_eq!(a.email_address, "a@example.com");
        assert_eq!(b.email_address, "b@example.com");

        let mut seen = provider.seen_tokens.lock().unwrap().clone();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("order-a".to_string(), "token-a".to_string()),
                ("order-b".to_string(), "token-b".to_string()),
            ]
        );
    }
}
