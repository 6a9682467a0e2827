//! HTTP middleware stack for the checkout.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (per-request hub, HTTP transaction)
//! 2. Sentry request redaction
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)

pub mod request_context;

pub use request_context::{
    REQUEST_ID_HEADER, redact_event, redact_sentry_request, request_id_middleware,
};
