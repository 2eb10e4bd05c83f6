//! Common types and utilities for dynprice
//!
//! This crate provides shared types, traits, and utilities used across
//! all dynprice crates.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Shared domain types (Quote)
//! - [`clock`] - Clock abstraction supplying "now" to the price core

pub mod clock;
pub mod error;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use types::*;
