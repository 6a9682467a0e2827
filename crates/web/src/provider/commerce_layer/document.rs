//! JSON:API documents returned by Commerce Layer and their conversion into
//! [`OrderSnapshot`].
//!
//! Relationships are resolved against the compound document's `included`
//! array. A linkage that points at a resource the backend did not include
//! means the response is incomplete, and is reported as malformed rather
//! than silently treated as an absent facet.

use std::collections::HashMap;

use checkout_core::{
    Address, AddressBook, AddressId, Customer, CustomerId, OrderId, OrderSnapshot, PaymentMethod,
    PaymentMethodId, Shipment, ShipmentId,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::provider::ProviderError;

// =============================================================================
// Document Types
// =============================================================================

/// A compound document with a single primary resource.
#[derive(Debug, Deserialize)]
pub(super) struct Document {
    pub data: Resource,
    #[serde(default)]
    pub included: Vec<Resource>,
}

/// A resource object.
#[derive(Debug, Deserialize)]
pub(super) struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

/// A relationship object; only resource linkage is used.
#[derive(Debug, Deserialize)]
pub(super) struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

/// Resource linkage: to-one or to-many.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Linkage {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// Type and ID of a linked resource.
#[derive(Debug, Deserialize)]
pub(super) struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Resource {
    /// Deserialize this resource's attributes.
    fn attributes<T: DeserializeOwned>(&self) -> Result<T, ProviderError> {
        Ok(serde_json::from_value(serde_json::Value::Object(
            self.attributes.clone(),
        ))?)
    }

    fn linkage(&self, name: &str) -> Option<&Linkage> {
        self.relationships.get(name).and_then(|r| r.data.as_ref())
    }
}

// =============================================================================
// Attribute Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct OrderAttributes {
    customer_email: Option<String>,
    language_code: Option<String>,
    skus_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AddressAttributes {
    name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    company: Option<String>,
    line_1: Option<String>,
    line_2: Option<String>,
    city: Option<String>,
    zip_code: Option<String>,
    state_code: Option<String>,
    country_code: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomerAttributes {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomerAddressAttributes {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShipmentAttributes {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentMethodAttributes {
    name: Option<String>,
    payment_source_type: Option<String>,
}

// =============================================================================
// Conversion
// =============================================================================

/// Lookup of included resources by `(type, id)`.
struct Included<'a> {
    resources: HashMap<(&'a str, &'a str), &'a Resource>,
}

impl<'a> Included<'a> {
    fn new(resources: &'a [Resource]) -> Self {
        Self {
            resources: resources
                .iter()
                .map(|r| ((r.kind.as_str(), r.id.as_str()), r))
                .collect(),
        }
    }

    fn get(&self, identifier: &'a ResourceIdentifier) -> Result<&'a Resource, ProviderError> {
        self.resources
            .get(&(identifier.kind.as_str(), identifier.id.as_str()))
            .copied()
            .ok_or_else(|| {
                ProviderError::Malformed(format!(
                    "{} {} is linked but not included",
                    identifier.kind, identifier.id
                ))
            })
    }

    /// Resolve a to-one relationship of `resource`.
    fn one(&self, resource: &'a Resource, name: &str) -> Result<Option<&'a Resource>, ProviderError> {
        match resource.linkage(name) {
            None => Ok(None),
            Some(Linkage::One(identifier)) => self.get(identifier).map(Some),
            Some(Linkage::Many(_)) => Err(ProviderError::Malformed(format!(
                "expected to-one relationship '{name}' on {}",
                resource.kind
            ))),
        }
    }

    /// Resolve a to-many relationship of `resource`.
    fn many(&self, resource: &'a Resource, name: &str) -> Result<Vec<&'a Resource>, ProviderError> {
        match resource.linkage(name) {
            None => Ok(Vec::new()),
            Some(Linkage::Many(identifiers)) => {
                identifiers.iter().map(|id| self.get(id)).collect()
            }
            Some(Linkage::One(_)) => Err(ProviderError::Malformed(format!(
                "expected to-many relationship '{name}' on {}",
                resource.kind
            ))),
        }
    }
}

/// Convert an order document into a snapshot.
pub(super) fn convert_order(document: &Document) -> Result<OrderSnapshot, ProviderError> {
    let order = &document.data;
    if order.kind != "orders" {
        return Err(ProviderError::Malformed(format!(
            "expected an orders resource, got {}",
            order.kind
        )));
    }

    let included = Included::new(&document.included);
    let attributes: OrderAttributes = order.attributes()?;

    let shipping_address = included
        .one(order, "shipping_address")?
        .map(convert_address)
        .transpose()?;
    let billing_address = included
        .one(order, "billing_address")?
        .map(convert_address)
        .transpose()?;
    let shipments = included
        .many(order, "shipments")?
        .into_iter()
        .map(convert_shipment)
        .collect::<Result<Vec<_>, _>>()?;
    let payment_method = included
        .one(order, "payment_method")?
        .map(convert_payment_method)
        .transpose()?;
    let customer = included
        .one(order, "customer")?
        .map(|c| convert_customer(c, &included))
        .transpose()?;

    Ok(OrderSnapshot {
        id: OrderId::new(order.id.as_str()),
        customer_email: attributes.customer_email,
        language_code: attributes.language_code,
        skus_count: attributes.skus_count.unwrap_or(0),
        shipping_address,
        billing_address,
        shipments,
        payment_method,
        customer,
    })
}

fn convert_address(resource: &Resource) -> Result<Address, ProviderError> {
    let a: AddressAttributes = resource.attributes()?;
    Ok(Address {
        id: Some(AddressId::new(resource.id.as_str())),
        name: a.name.unwrap_or_default(),
        first_name: a.first_name,
        last_name: a.last_name,
        company: a.company,
        line_1: a.line_1,
        line_2: a.line_2,
        city: a.city,
        zip_code: a.zip_code,
        state_code: a.state_code,
        country_code: a.country_code,
        phone: a.phone,
        email: a.email,
    })
}

fn convert_customer<'a>(
    resource: &'a Resource,
    included: &Included<'a>,
) -> Result<Customer, ProviderError> {
    let attributes: CustomerAttributes = resource.attributes()?;
    let address_book = included
        .many(resource, "customer_addresses")?
        .into_iter()
        .map(|saved| {
            let a: CustomerAddressAttributes = saved.attributes()?;
            Ok(Address::named(a.name.unwrap_or_default()))
        })
        .collect::<Result<AddressBook, ProviderError>>()?;

    Ok(Customer {
        id: CustomerId::new(resource.id.as_str()),
        email: attributes.email,
        address_book,
    })
}

fn convert_shipment(resource: &Resource) -> Result<Shipment, ProviderError> {
    let a: ShipmentAttributes = resource.attributes()?;
    Ok(Shipment {
        id: ShipmentId::new(resource.id.as_str()),
        status: a.status,
    })
}

fn convert_payment_method(resource: &Resource) -> Result<PaymentMethod, ProviderError> {
    let a: PaymentMethodAttributes = resource.attributes()?;
    Ok(PaymentMethod {
        id: PaymentMethodId::new(resource.id.as_str()),
        name: a.name,
        payment_source_type: a.payment_source_type,
    })
}
