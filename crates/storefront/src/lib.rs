//! RocketShoes Storefront library.
//!
//! This crate provides the cart store and everything around it as a library,
//! allowing it to be tested and reused by the server and the CLI.
//!
//! # Modules
//!
//! - [`cart`] - Cart store: add, remove and update-amount operations
//! - [`catalog`] - Remote product/stock catalog client
//! - [`storage`] - Key-value slot persistence for the cart
//! - [`notify`] - User-facing failure toasts
//! - [`routes`] - JSON cart API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;
pub mod storage;
