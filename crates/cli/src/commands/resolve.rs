//! Order facts inspection.
//!
//! # Usage
//!
//! ```bash
//! # Print the checkout facts of an order (fallback facts on failure)
//! checkout-cli resolve --order-id wRPpheqxyZ --access-token "$TOKEN"
//!
//! # Fail with the provider error instead of printing fallback facts
//! checkout-cli resolve --order-id wRPpheqxyZ --access-token "$TOKEN" --strict
//! ```
//!
//! # Environment Variables
//!
//! - `COMMERCE_API_ENDPOINT` - Commerce backend URL (unless `--endpoint` is given)

use std::sync::Arc;
use std::time::Duration;

use checkout_core::{OrderReference, ReferenceError};
use checkout_web::config::{CommerceConfig, ConfigError};
use checkout_web::locale::SentryLocaleSwitch;
use checkout_web::provider::CommerceLayerProvider;
use checkout_web::{OrderFactsResolver, ResolveError};
use thiserror::Error;

/// Errors that can occur while resolving an order from the command line.
#[derive(Debug, Error)]
pub enum ResolveCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Order id or access token is blank.
    #[error("Invalid order reference: {0}")]
    Reference(#[from] ReferenceError),

    /// Endpoint or timeout is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The order could not be loaded (strict mode only).
    #[error("Failed to resolve order: {0}")]
    Resolve(#[from] ResolveError),

    /// The facts could not be serialized.
    #[error("Failed to serialize facts: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Options for the `resolve` command.
#[derive(Debug)]
pub struct ResolveOptions {
    pub order_id: String,
    pub access_token: String,
    pub endpoint: Option<String>,
    pub timeout: Duration,
    pub strict: bool,
}

/// Resolve one order and print its facts as JSON.
///
/// # Errors
///
/// Returns an error if the input is invalid, or, in strict mode, if the
/// order cannot be loaded.
pub async fn run(options: ResolveOptions) -> Result<(), ResolveCommandError> {
    let reference = OrderReference::new(&options.order_id, &options.access_token)?;

    let endpoint = match options.endpoint {
        Some(endpoint) => endpoint,
        None => {
            let _ = dotenvy::dotenv();
            std::env::var("COMMERCE_API_ENDPOINT")
                .map_err(|_| ResolveCommandError::MissingEnvVar("COMMERCE_API_ENDPOINT"))?
        }
    };
    let commerce = CommerceConfig::new(&endpoint, options.timeout)?;

    let resolver = OrderFactsResolver::new(
        commerce,
        Arc::new(CommerceLayerProvider::new()),
        Arc::new(SentryLocaleSwitch),
    );

    let facts = if options.strict {
        resolver.try_resolve(&reference).await?.facts
    } else {
        resolver.resolve(&reference).await
    };

    print_json(&serde_json::to_string_pretty(&facts)?);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json(json: &str) {
    println!("{json}");
}
