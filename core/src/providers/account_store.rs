//! Account store trait.

use std::future::Future;

use crate::error::Result;
use crate::state::{Account, AccountId};

/// Account document store.
///
/// The request lifecycle owns account creation; later mutations by other
/// application features go through the same contract.
pub trait AccountStore: Send + Sync {
    /// Insert or replace an account record keyed by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the write fails.
    fn upsert(&self, account: &Account) -> impl Future<Output = Result<Account>> + Send;

    /// Get an account by id.
    ///
    /// # Errors
    ///
    /// - `CoreError::NotFound` if no record exists
    /// - `CoreError::Store` if the query fails
    fn get(&self, id: AccountId) -> impl Future<Output = Result<Account>> + Send;

    /// Find an account by email, if any.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the query fails.
    fn find_by_email(&self, email: &str)
        -> impl Future<Output = Result<Option<Account>>> + Send;
}
