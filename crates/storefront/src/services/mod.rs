//! Services built on the preference store.
//!
//! # Services
//!
//! - `auth` - Local registration, password login, logout and profile edits
//! - `session` - Explicit "who is logged in" context

pub mod auth;
pub mod session;

pub use auth::{AuthError, AuthService, LoginOutcome, NewUser};
pub use session::SessionContext;
