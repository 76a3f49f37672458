//! Domain models for the storefront state.
//!
//! These are the records persisted as JSON blobs in the preference store.
//! Field names on the wire follow the layout written by earlier clients, so
//! existing on-device data stays readable.

pub mod attempt;
pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use attempt::LoginAttempt;
pub use cart::CartLine;
pub use product::{Product, ProductKey};
pub use session::SessionState;
pub use user::{User, UserProfile};
