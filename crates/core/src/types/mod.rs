//! Core types for the checkout.
//!
//! This module provides type-safe wrappers for commerce platform concepts.

pub mod address;
pub mod id;
pub mod order;
pub mod reference;

pub use address::{Address, AddressBook, AddressMatch};
pub use id::*;
pub use order::{Customer, OrderSnapshot, PaymentMethod, Shipment};
pub use reference::{AccessToken, OrderReference, ReferenceError};
