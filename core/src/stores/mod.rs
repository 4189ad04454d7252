//! Store implementations.
//!
//! Production deployments implement the `providers` store traits against
//! a hosted document database; `memory` is the embedded implementation
//! used by the development server and the test suite.

pub mod memory;

pub use memory::{MemoryAccountStore, MemoryRequestStore, MemoryWithdrawalStore};
