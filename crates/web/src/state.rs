//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::CheckoutConfig;
use crate::locale::{LocaleSwitch, SentryLocaleSwitch};
use crate::provider::{CommerceLayerProvider, OrderProvider};
use crate::resolver::OrderFactsResolver;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the order facts resolver.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CheckoutConfig,
    resolver: OrderFactsResolver,
}

impl AppState {
    /// Create application state backed by Commerce Layer.
    #[must_use]
    pub fn new(config: CheckoutConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(CommerceLayerProvider::new()),
            Arc::new(SentryLocaleSwitch),
        )
    }

    /// Create application state with explicit collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: CheckoutConfig,
        provider: Arc<dyn OrderProvider>,
        locale: Arc<dyn LocaleSwitch>,
    ) -> Self {
        let resolver = OrderFactsResolver::new(config.commerce.clone(), provider, locale);

        Self {
            inner: Arc::new(AppStateInner { config, resolver }),
        }
    }

    /// Get a reference to the checkout configuration.
    #[must_use]
    pub fn config(&self) -> &CheckoutConfig {
        &self.inner.config
    }

    /// Get a reference to the order facts resolver.
    #[must_use]
    pub fn resolver(&self) -> &OrderFactsResolver {
        &self.inner.resolver
    }
}
