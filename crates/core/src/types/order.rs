//! Provider-agnostic snapshot of an order and its checkout facets.

use serde::{Deserialize, Serialize};

use super::address::{Address, AddressBook};
use super::id::{CustomerId, OrderId, PaymentMethodId, ShipmentId};

/// A planned or executed delivery unit of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Shipment ID.
    pub id: ShipmentId,
    /// Platform shipment status (e.g. `draft`, `upcoming`).
    pub status: Option<String>,
}

/// Payment method selected for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Payment method ID.
    pub id: PaymentMethodId,
    /// Display name.
    pub name: Option<String>,
    /// Payment source type (e.g. `stripe_payments`).
    pub payment_source_type: Option<String>,
}

/// A registered customer attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Account email.
    pub email: Option<String>,
    /// Saved addresses.
    pub address_book: AddressBook,
}

/// An order as returned by the order-data provider, with every facet the
/// checkout needs already loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// Order ID.
    pub id: OrderId,
    /// Contact email stored on the order.
    pub customer_email: Option<String>,
    /// Order language (e.g. `en`).
    pub language_code: Option<String>,
    /// Number of SKU line items.
    pub skus_count: u32,
    /// Shipping address.
    pub shipping_address: Option<Address>,
    /// Billing address.
    pub billing_address: Option<Address>,
    /// Shipments.
    pub shipments: Vec<Shipment>,
    /// Selected payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Registered customer, if any.
    pub customer: Option<Customer>,
}

impl OrderSnapshot {
    /// Whether the order was placed without a registered customer.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.customer.is_none()
    }

    /// Saved addresses of the attached customer.
    ///
    /// Orders without a customer have an empty book.
    #[must_use]
    pub fn address_book(&self) -> &AddressBook {
        static EMPTY: AddressBook = AddressBook::new(Vec::new());

        self.customer.as_ref().map_or(&EMPTY, |c| &c.address_book)
    }
}
