//! Access tokens must not reach Sentry.
//!
//! Checkout links carry the order access token in the query string. These
//! tests drive the app behind the same Sentry tower layers as the binary and
//! inspect every envelope the client would send.
//!
//! Run with: `cargo test -p checkout-integration-tests --test sentry_redaction`

#![allow(clippy::unwrap_used)]

use checkout_integration_tests::TestContext;
use sentry::Envelope;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::layer::SubscriberExt;

const SECRET_TOKEN: &str = "SUPER_SECRET_TOKEN";

/// Open `uri` against a failing backend and capture what Sentry would send.
fn capture_failed_checkout(uri: &str, traces_sample_rate: f32) -> Vec<Envelope> {
    let subscriber = tracing_subscriber::registry().with(sentry_tracing::layer());

    tracing::subscriber::with_default(subscriber, || {
        sentry::test::with_captured_envelopes_options(
            || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .unwrap();
                runtime.block_on(async {
                    let ctx = TestContext::instrumented().await;
                    ctx.stub_status(500).await;
                    ctx.get(uri).await;
                });
            },
            sentry::ClientOptions {
                traces_sample_rate,
                ..Default::default()
            },
        )
    })
}

fn serialized(envelopes: &[Envelope]) -> String {
    let mut bytes = Vec::new();
    for envelope in envelopes {
        envelope.to_writer(&mut bytes).unwrap();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn test_checkout_error_events_omit_access_token() {
    let envelopes = capture_failed_checkout(
        &format!("http://checkout.local/?orderId=o1&accessToken={SECRET_TOKEN}"),
        0.0,
    );

    let events: Vec<_> = envelopes.iter().filter_map(Envelope::event).collect();
    assert!(!events.is_empty());
    assert!(
        events
            .iter()
            .any(|e| e.message.as_deref() == Some("Error on retrieving order"))
    );

    for event in &events {
        let url = event.request.as_ref().and_then(|r| r.url.as_ref()).unwrap();
        assert_eq!(url.path(), "/");
        assert!(url.query().unwrap().contains("orderId=o1"));
        assert!(!url.as_str().contains(SECRET_TOKEN));
    }

    assert!(!serialized(&envelopes).contains(SECRET_TOKEN));
}

#[test]
fn test_facts_api_transactions_omit_access_token() {
    let envelopes = capture_failed_checkout(
        &format!("http://checkout.local/api/order-facts?orderId=o1&accessToken={SECRET_TOKEN}"),
        1.0,
    );

    let payload = serialized(&envelopes);
    assert!(payload.contains("orderId=o1"));
    assert!(!payload.contains(SECRET_TOKEN));
}
