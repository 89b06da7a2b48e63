//! # Shopping-list client core
//!
//! Authenticated API dispatch for the shopping-list service: bearer-token
//! requests with a single-flight token refresh on 401, typed REST wrappers
//! for catalog/session/item resources, an offline mutation guard, and a
//! local query-cache persister.
//!
//! Modules:
//! - `api` - request dispatcher and client error taxonomy
//! - `auth` - token store and refresh coordinator
//! - `services` - REST wrappers for auth, catalog, sessions, items
//! - `storage` - injected key-value storage backends
//! - `cache` - query-cache persister with version/age checks
//! - `search` - catalog autocomplete and dedup

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod helpers;
pub mod net;
pub mod search;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::api::dispatcher::ApiClient;
pub use crate::api::error::ApiError;
pub use crate::auth::tokens::{TokenPair, TokenStore};
