//! MealDash Core - Shared types library.
//!
//! This crate provides the domain types used across the MealDash client
//! workspace:
//! - `client` - API client, session store, and cart reconciliation
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles,
//!   and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
