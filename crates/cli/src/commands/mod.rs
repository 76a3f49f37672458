//! Subcommand implementations.
//!
//! Command results go to stdout; diagnostics go through `tracing`.

#![allow(clippy::print_stdout)]

pub mod account;
pub mod cart;
pub mod products;

use serde::Serialize;
use tcg_storefront::AppError;
use tcg_storefront::store::StoreError;

/// Print `value` as pretty JSON on stdout.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(StoreError::from)?;
    println!("{json}");
    Ok(())
}
