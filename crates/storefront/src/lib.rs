//! TCG Store client state library.
//!
//! Local cart, session and catalog state for the TCG Store client, kept in
//! an observable preference store. Also provides typed clients for the
//! remote auth and main services.
//!
//! # Layout
//!
//! - [`models`] - records persisted in the store
//! - [`store`] - preference store plus the cart, users, products and
//!   login-attempt managers built on it
//! - [`services`] - authentication and session context
//! - [`remote`] - HTTP clients for the remote deployment
//! - [`validation`] - form field rules
//! - [`config`] - environment configuration
//! - [`error`] - unified error type

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod store;
pub mod validation;

pub use error::AppError;
pub use store::{CartManager, Catalog, LoginAttemptLog, Preferences, UserDirectory};
