//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types used across all RocketShoes components:
//! - `storefront` - Cart store, catalog client, persistence and HTTP API
//! - `cli` - Command-line driver for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transitions - no I/O, no
//! HTTP clients, no storage. Every cart mutation is a function from an old
//! [`Cart`] to a new one, so callers can check and commit atomically.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, catalog records, cart line items and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
