//! Per-request context for logs and Sentry.
//!
//! [`request_id_middleware`] gives each request an id, reused from
//! `x-request-id` or generated, that is recorded on the span, tagged on the
//! Sentry scope and echoed back in the response.
//!
//! Checkout links carry the order access token in the query string. Sentry's
//! HTTP layer attaches the full request URL to events and transactions, so
//! [`redact_sentry_request`] replaces the `accessToken` parameter in both
//! with [`REDACTED`].

use std::borrow::Cow;

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use sentry::protocol::{Event, Request as SentryRequest};
use tracing::Span;
use url::Url;
use url::form_urlencoded;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Query parameter carrying the order access token.
pub const ACCESS_TOKEN_PARAM: &str = "accessToken";

/// Replacement for redacted values.
pub const REDACTED: &str = "[Filtered]";

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request_id(&request);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Middleware that redacts the access token from Sentry's request context.
///
/// Must sit directly inside `SentryHttpLayer`, where the scope span is still
/// the HTTP transaction.
pub async fn redact_sentry_request(request: Request, next: Next) -> Response {
    let redacted = SentryRequest {
        method: Some(request.method().to_string()),
        url: request_url(&request).map(|url| redact_url(&url)),
        ..Default::default()
    };

    sentry::configure_scope(|scope| {
        if let Some(transaction) = scope.get_span() {
            transaction.set_request(redacted);
        }
        scope.add_event_processor(redact_event);
    });

    next.run(request).await
}

fn request_id(request: &Request) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Absolute URL of the request, using the `Host` header for origin-form URIs.
fn request_url(request: &Request) -> Option<Url> {
    let uri = request.uri();
    if uri.authority().is_some() {
        return Url::parse(&uri.to_string()).ok();
    }

    let host = request.headers().get(header::HOST)?.to_str().ok()?;
    let path = uri.path_and_query().map_or("/", |p| p.as_str());
    Url::parse(&format!("http://{host}{path}")).ok()
}

/// Redact the access token from the request attached to a Sentry event.
///
/// Usable both as a scope event processor and as a client `before_send`.
#[must_use]
pub fn redact_event(mut event: Event<'static>) -> Option<Event<'static>> {
    if let Some(request) = event.request.as_mut() {
        if let Some(url) = request.url.as_mut() {
            *url = redact_url(url);
        }
        if let Some(query) = request.query_string.as_mut() {
            *query = redact_query(query);
        }
    }
    Some(event)
}

/// Replace the access token in a URL's query string.
#[must_use]
pub fn redact_url(url: &Url) -> Url {
    let mut url = url.clone();
    let query = url.query().map(redact_query);
    url.set_query(query.as_deref());
    url
}

/// Replace the access token in an encoded query string.
#[must_use]
pub fn redact_query(query: &str) -> String {
    let pairs = form_urlencoded::parse(query.as_bytes()).map(|(key, value)| {
        let value = if key == ACCESS_TOKEN_PARAM {
            Cow::Borrowed(REDACTED)
        } else {
            value
        };
        (key, value)
    });

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_query_replaces_token_only() {
        let redacted = redact_query("orderId=o1&accessToken=secret-token");
        assert_eq!(redacted, "orderId=o1&accessToken=%5BFiltered%5D");
    }

    #[test]
    fn test_redact_query_without_token() {
        assert_eq!(redact_query("orderId=o1"), "orderId=o1");
    }

    #[test]
    fn test_redact_url_keeps_path() {
        let url = Url::parse("http://checkout.local/?accessToken=secret&orderId=o1").unwrap();
        let redacted = redact_url(&url);

        assert_eq!(redacted.path(), "/");
        assert!(!redacted.as_str().contains("secret"));
        assert!(redacted.as_str().contains("orderId=o1"));
    }

    #[test]
    fn test_redact_url_without_query() {
        let url = Url::parse("http://checkout.local/health").unwrap();
        assert_eq!(redact_url(&url), url);
    }

    #[test]
    fn test_redact_event_request() {
        let event = Event {
            request: Some(SentryRequest {
                url: Some(
                    Url::parse("http://checkout.local/?orderId=o1&accessToken=secret").unwrap(),
                ),
                query_string: Some("orderId=o1&accessToken=secret".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let event = redact_event(event).unwrap();
        let request = event.request.unwrap();
        assert!(!request.url.unwrap().as_str().contains("secret"));
        assert!(!request.query_string.unwrap().contains("secret"));
    }

    #[test]
    fn test_request_url_from_host_header() {
        let request = axum::http::Request::builder()
            .uri("/?orderId=o1")
            .header(header::HOST, "checkout.local")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(
            request_url(&request).unwrap().as_str(),
            "http://checkout.local/?orderId=o1"
        );
    }

    #[test]
    fn test_request_id_reuses_header() {
        let request = axum::http::Request::builder()
            .header(REQUEST_ID_HEADER, "req-1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(request_id(&request), "req-1");

        let request = axum::http::Request::builder()
            .header(REQUEST_ID_HEADER, "")
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(Uuid::parse_str(&request_id(&request)).is_ok());
    }
}
