//! HTTP handlers for the lifecycle endpoints.
//!
//! Handlers are thin wrappers: validate the typed body at the boundary,
//! call the core service, and map the result (or the taxonomy error)
//! onto an HTTP response.

pub mod exchange;
pub mod health;
pub mod requests;
pub mod withdrawals;
