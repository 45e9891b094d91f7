//! RocketShoes Core - Shared cart and catalog types.
//!
//! This crate provides the domain types used across all RocketShoes components:
//! - `storefront` - Cart store, catalog client and the JSON cart server
//! - `cli` - Command-line front end for the same cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Every cart transition is a pure function from one
//! [`Cart`] to a new one, which keeps the store trivial to test.
//!
//! # Modules
//!
//! - [`types`] - Product ids, products, stock, cart lines and price formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
