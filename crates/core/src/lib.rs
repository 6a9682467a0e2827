//! Checkout Core - Order types and fact derivation.
//!
//! This crate provides the types shared by the checkout components:
//! - `web` - Checkout entrypoint and JSON facts endpoint
//! - `cli` - Command-line order inspection
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Loading an order is the job of an order provider in the `web`
//! crate; turning the loaded order into checkout facts happens here.
//!
//! # Modules
//!
//! - [`types`] - IDs, order references, addresses, and order snapshots
//! - [`facts`] - [`OrderFacts`] derivation and the fallback facts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod facts;
pub mod types;

pub use facts::{Checkout, OrderFacts, OrderSummary};
pub use types::*;
