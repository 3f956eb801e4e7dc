//! Rocket Shoes Core - Shared cart and catalog types.
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart rules - no I/O, no
//! storage access, no HTTP clients. The storefront crate wires these rules
//! to the stock/product backend and to persistent storage.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, products, stock snapshots, and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
