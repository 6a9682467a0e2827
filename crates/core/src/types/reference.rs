//! Order references supplied by the caller of a checkout.
//!
//! A checkout is opened with an order identifier and an access token issued
//! by the commerce backend. Both are opaque: the only check performed here is
//! that neither is empty. Whether they are *correct* is for the backend to
//! decide.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::id::OrderId;

/// Errors that can occur when building an [`OrderReference`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The order identifier is missing or blank.
    #[error("order id cannot be empty")]
    MissingOrderId,
    /// The access token is missing or blank.
    #[error("access token cannot be empty")]
    MissingAccessToken,
}

/// Bearer token granting access to a single order.
///
/// `Debug` output is redacted so tokens never end up in logs.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Parse an access token, rejecting blank input.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::MissingAccessToken`] if the input is empty
    /// or whitespace only.
    pub fn parse(token: &str) -> Result<Self, ReferenceError> {
        if token.trim().is_empty() {
            return Err(ReferenceError::MissingAccessToken);
        }
        Ok(Self(SecretString::from(token.to_owned())))
    }

    /// Expose the raw token, e.g. for an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// The pair of values identifying the order behind a checkout.
#[derive(Debug, Clone)]
pub struct OrderReference {
    order_id: OrderId,
    access_token: AccessToken,
}

impl OrderReference {
    /// Build a reference from raw caller input.
    ///
    /// The order id is checked first, so a request missing both values
    /// reports [`ReferenceError::MissingOrderId`].
    ///
    /// # Errors
    ///
    /// Returns an error if either value is empty or whitespace only.
    pub fn new(order_id: &str, access_token: &str) -> Result<Self, ReferenceError> {
        if order_id.trim().is_empty() {
            return Err(ReferenceError::MissingOrderId);
        }
        let access_token = AccessToken::parse(access_token)?;

        Ok(Self {
            order_id: OrderId::new(order_id),
            access_token,
        })
    }

    /// Build a reference from optional query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is absent, empty, or whitespace only.
    pub fn from_params(
        order_id: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<Self, ReferenceError> {
        Self::new(order_id.unwrap_or_default(), access_token.unwrap_or_default())
    }

    /// The order identifier.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// The access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let reference = OrderReference::new("wRPpheqxyZ", "token-123").unwrap();
        assert_eq!(reference.order_id().as_str(), "wRPpheqxyZ");
        assert_eq!(reference.access_token().expose(), "token-123");
    }

    #[test]
    fn test_new_empty_order_id() {
        assert_eq!(
            OrderReference::new("", "token").unwrap_err(),
            ReferenceError::MissingOrderId
        );
        assert_eq!(
            OrderReference::new("   ", "token").unwrap_err(),
            ReferenceError::MissingOrderId
        );
    }

    #[test]
    fn test_new_empty_access_token() {
        assert_eq!(
            OrderReference::new("123123", "").unwrap_err(),
            ReferenceError::MissingAccessToken
        );
    }

    #[test]
    fn test_both_missing_reports_order_id() {
        assert_eq!(
            OrderReference::from_params(None, None).unwrap_err(),
            ReferenceError::MissingOrderId
        );
    }

    #[test]
    fn test_from_params_missing_token() {
        assert_eq!(
            OrderReference::from_params(Some("123123"), None).unwrap_err(),
            ReferenceError::MissingAccessToken
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let reference = OrderReference::new("order", "super_secret_token").unwrap();
        let debug_output = format!("{reference:?}");

        assert!(debug_output.contains("order"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
