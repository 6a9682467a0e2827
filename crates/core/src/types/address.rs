//! Postal addresses and name-based address comparison.

use serde::{Deserialize, Serialize};

use super::id::AddressId;

/// A postal address attached to an order or saved by a customer.
///
/// Only `name` takes part in comparisons; every other field is passed
/// through to the caller untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address ID on the commerce platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    /// Display name computed by the platform (usually "First Last").
    #[serde(default)]
    pub name: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Address line 1.
    #[serde(default)]
    pub line_1: Option<String>,
    /// Address line 2.
    #[serde(default)]
    pub line_2: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Postal/ZIP code.
    #[serde(default)]
    pub zip_code: Option<String>,
    /// State or province code.
    #[serde(default)]
    pub state_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default)]
    pub country_code: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

impl Address {
    /// Create an address carrying only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Outcome of comparing two possibly-absent addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMatch {
    /// Both present with equal names.
    Same,
    /// Both present with different names.
    Different,
    /// At least one side is absent.
    NotComparable,
}

impl AddressMatch {
    /// Compare two addresses by name.
    #[must_use]
    pub fn between(left: Option<&Address>, right: Option<&Address>) -> Self {
        match (left, right) {
            (Some(l), Some(r)) if l.name == r.name => Self::Same,
            (Some(_), Some(_)) => Self::Different,
            _ => Self::NotComparable,
        }
    }

    /// Whether the comparison found the same address.
    #[must_use]
    pub const fn is_same(self) -> bool {
        matches!(self, Self::Same)
    }
}

/// Addresses previously saved by a registered customer, in platform order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook(Vec<Address>);

impl AddressBook {
    /// Create an address book from saved addresses.
    #[must_use]
    pub const fn new(addresses: Vec<Address>) -> Self {
        Self(addresses)
    }

    /// Number of saved addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the book holds no addresses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `address` is not yet saved in this book.
    ///
    /// An absent address is `NotComparable` against every entry and is
    /// therefore reported as new.
    #[must_use]
    pub fn is_new(&self, address: Option<&Address>) -> bool {
        !self
            .0
            .iter()
            .any(|saved| AddressMatch::between(Some(saved), address).is_same())
    }
}

impl FromIterator<Address> for AddressBook {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_match_same_name() {
        let a = Address::named("Ada Lovelace");
        let mut b = Address::named("Ada Lovelace");
        b.city = Some("London".to_string());

        assert_eq!(AddressMatch::between(Some(&a), Some(&b)), AddressMatch::Same);
    }

    #[test]
    fn test_match_different_name() {
        let a = Address::named("Ada Lovelace");
        let b = Address::named("Charles Babbage");

        assert_eq!(
            AddressMatch::between(Some(&a), Some(&b)),
            AddressMatch::Different
        );
    }

    #[test]
    fn test_match_absent_side() {
        let a = Address::named("Ada Lovelace");

        assert_eq!(
            AddressMatch::between(Some(&a), None),
            AddressMatch::NotComparable
        );
        assert_eq!(
            AddressMatch::between(None, Some(&a)),
            AddressMatch::NotComparable
        );
        assert_eq!(AddressMatch::between(None, None), AddressMatch::NotComparable);
    }

    #[test]
    fn test_is_new_when_name_saved() {
        let book: AddressBook = ["Home", "Office"].into_iter().map(Address::named).collect();

        assert!(!book.is_new(Some(&Address::named("Office"))));
        assert!(book.is_new(Some(&Address::named("Holiday"))));
    }

    #[test]
    fn test_is_new_absent_address() {
        let book: AddressBook = ["Home"].into_iter().map(Address::named).collect();
        assert!(book.is_new(None));
    }

    #[test]
    fn test_is_new_empty_book() {
        assert!(AddressBook::default().is_new(Some(&Address::named("Home"))));
    }

    #[test]
    fn test_address_serializes_camel_case() {
        let mut address = Address::named("Ada Lovelace");
        address.line_1 = Some("12 St James's Square".to_string());
        address.zip_code = Some("SW1Y 4JH".to_string());

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["name"], "Ada Lovelace");
        assert_eq!(json["line1"], "12 St James's Square");
        assert_eq!(json["zipCode"], "SW1Y 4JH");
        assert!(json.get("id").is_none());
    }
}
