//! Withdrawal store trait.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::state::{WithdrawalId, WithdrawalRequest};

/// Withdrawal document store.
///
/// Supports the processor's claim-then-process pattern via the same
/// version-keyed conditional write the request store uses.
pub trait WithdrawalStore: Send + Sync {
    /// Insert a new withdrawal record.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the write fails.
    fn insert(
        &self,
        withdrawal: &WithdrawalRequest,
    ) -> impl Future<Output = Result<WithdrawalRequest>> + Send;

    /// Get a withdrawal by id.
    ///
    /// # Errors
    ///
    /// - `CoreError::NotFound` if no record exists
    /// - `CoreError::Store` if the query fails
    fn get(&self, id: WithdrawalId) -> impl Future<Output = Result<WithdrawalRequest>> + Send;

    /// List records due for processing at `now`: status `Pending`, not
    /// yet debited, `scheduled_at <= now`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the query fails.
    fn list_due(
        &self,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<WithdrawalRequest>>> + Send;

    /// Conditionally replace a withdrawal record.
    ///
    /// Same contract as `RequestStore::update_if_version`: the write is
    /// accepted only if `updated.version` matches the stored version.
    ///
    /// # Errors
    ///
    /// - `CoreError::StaleState` if the stored version differs
    /// - `CoreError::NotFound` if the record no longer exists
    /// - `CoreError::Store` if the write fails
    fn update_if_version(
        &self,
        updated: &WithdrawalRequest,
    ) -> impl Future<Output = Result<WithdrawalRequest>> + Send;
}
