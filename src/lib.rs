//! Saved carts for B2B checkout.
//!
//! Lists carts a buyer saved earlier, scoped to their organization and cost
//! center, and restores a chosen one into the live order form by replaying
//! it through the checkout API one call at a time.

pub mod api;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod query;
pub mod restore;
pub mod store;
pub mod tls;

pub use error::{CartError, Result};
