//! RocketShoes storefront library.
//!
//! The cart store, its catalog and persistence seams, and the JSON cart
//! server built on top of them. The binary in `main.rs` and the CLI both
//! drive the same [`cart::CartStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
