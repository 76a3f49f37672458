//! TCG Store Core - Shared value types.
//!
//! This crate provides the value types used across the TCG Store components:
//! - `storefront` - Local cart, session and catalog state
//! - `cli` - Command-line driver for the local state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, product IDs, prices and password digests

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
