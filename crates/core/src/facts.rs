//! Checkout facts derived from an order snapshot.
//!
//! [`OrderFacts`] is what the checkout UI branches on. It is always
//! recomputed from a fresh [`OrderSnapshot`] and never mutated in place.
//! When an order cannot be loaded, callers receive [`OrderFacts::fallback`],
//! which no rendering path treats as an accessible order.

use serde::{Deserialize, Serialize};

use crate::types::{Address, AddressMatch, OrderSnapshot};

/// UI-relevant facts about an order.
///
/// Serialized in camelCase, matching the JSON contract of the checkout
/// front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct OrderFacts {
    pub is_guest: bool,
    pub is_using_new_billing_address: bool,
    pub is_using_new_shipping_address: bool,
    pub has_same_addresses: bool,
    pub has_email_address: bool,
    pub email_address: String,
    pub has_shipping_address: bool,
    pub shipping_address: Option<Address>,
    pub has_billing_address: bool,
    pub billing_address: Option<Address>,
    pub has_shipping_method: bool,
    pub has_payment_method: bool,
}

impl OrderFacts {
    /// Facts representing "no usable order".
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            is_guest: false,
            is_using_new_billing_address: true,
            is_using_new_shipping_address: true,
            has_same_addresses: false,
            has_email_address: false,
            email_address: String::new(),
            has_shipping_address: false,
            shipping_address: None,
            has_billing_address: false,
            billing_address: None,
            has_shipping_method: false,
            has_payment_method: false,
        }
    }

    /// Derive facts from a loaded order.
    #[must_use]
    pub fn from_snapshot(order: &OrderSnapshot) -> Self {
        let is_guest = order.is_guest();
        let shipping_address = order.shipping_address.clone();
        let billing_address = order.billing_address.clone();

        // Guests have no address book to compare against.
        let book = order.address_book();
        let is_new = |address: Option<&Address>| is_guest || book.is_new(address);

        let email_address = order.customer_email.clone().unwrap_or_default();

        Self {
            is_guest,
            is_using_new_billing_address: is_new(billing_address.as_ref()),
            is_using_new_shipping_address: is_new(shipping_address.as_ref()),
            has_same_addresses: AddressMatch::between(
                shipping_address.as_ref(),
                billing_address.as_ref(),
            )
            .is_same(),
            has_email_address: !email_address.is_empty(),
            email_address,
            has_shipping_address: shipping_address.is_some(),
            shipping_address,
            has_billing_address: billing_address.is_some(),
            billing_address,
            has_shipping_method: !order.shipments.is_empty(),
            has_payment_method: order.payment_method.is_some(),
        }
    }

    /// Whether the facts describe an order the checkout can show.
    ///
    /// Decided from the boolean fields alone: guest orders are always
    /// accessible, registered orders need at least one loaded facet.
    #[must_use]
    pub const fn is_accessible(&self) -> bool {
        self.is_guest
            || self.has_email_address
            || self.has_shipping_address
            || self.has_billing_address
            || self.has_shipping_method
            || self.has_payment_method
    }
}

impl Default for OrderFacts {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Order data the checkout shows besides the facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub language_code: Option<String>,
    pub skus_count: u32,
}

impl OrderSummary {
    /// Extract the summary of a loaded order.
    #[must_use]
    pub fn from_snapshot(order: &OrderSnapshot) -> Self {
        Self {
            language_code: order.language_code.clone(),
            skus_count: order.skus_count,
        }
    }
}

/// A resolved checkout: facts plus, for loaded orders, a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub facts: OrderFacts,
    pub summary: Option<OrderSummary>,
}

impl Checkout {
    /// Checkout for an order that could not be loaded.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            facts: OrderFacts::fallback(),
            summary: None,
        }
    }

    /// Checkout for a loaded order.
    #[must_use]
    pub fn from_snapshot(order: &OrderSnapshot) -> Self {
        Self {
            facts: OrderFacts::from_snapshot(order),
            summary: Some(OrderSummary::from_snapshot(order)),
        }
    }

    /// Whether the checkout can be shown.
    #[must_use]
    pub const fn is_accessible(&self) -> bool {
        self.summary.is_some() && self.facts.is_accessible()
    }
}
