//! ProStore Core - Shared domain types and pricing.
//!
//! This crate provides the types used across all ProStore components:
//! - `storefront` - The public shop (catalog, cart, checkout, accounts)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. The cart pricing rules live here so they can be
//! exercised without a running service.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices and pricing, cart items, emails, addresses,
//!   payment methods and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
