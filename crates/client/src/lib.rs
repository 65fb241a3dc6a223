//! MealDash client library.
//!
//! A typed client for the MealDash food-delivery platform's REST backend.
//! The crate holds the storefront's non-view logic: the durable session
//! store, the role-based route guard, the cart reconciliation workflow, and
//! the API client the presentation layer calls into.
//!
//! # Architecture
//!
//! - [`api`] - REST client over `reqwest`, bearer-token authenticated,
//!   read-mostly catalog responses cached via `moka`
//! - [`session`] - token/role persistence over a durable key/value store
//! - [`auth`] - login workflow: token extraction and role resolution
//! - [`guard`] - advisory role gating for screen subtrees
//! - [`cart`] - optimistic local cart with debounced server reconciliation
//!
//! Role information in this crate is a routing convenience only; the backend
//! authorizes every request on its own.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod guard;
pub mod session;
