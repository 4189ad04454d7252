//! Account-request store trait.

use std::future::Future;

use crate::error::Result;
use crate::state::{AccountRequest, RequestId, RequestStatus};

/// Account-request document store.
///
/// This trait abstracts over the hosted document database holding
/// request records. It must support equality filters on `email` and
/// `status`, and a conditional write keyed on the record's version so
/// status transitions have compare-and-swap semantics.
pub trait RequestStore: Send + Sync {
    /// Insert a freshly created request.
    ///
    /// Enforces the uniqueness invariant: at most one request with a
    /// non-terminal status per email.
    ///
    /// # Errors
    ///
    /// - `CoreError::Conflict` if a non-terminal request already exists
    ///   for the same email
    /// - `CoreError::Store` if the write fails
    fn insert(
        &self,
        request: &AccountRequest,
    ) -> impl Future<Output = Result<AccountRequest>> + Send;

    /// Get a request by id.
    ///
    /// # Errors
    ///
    /// - `CoreError::NotFound` if no record exists
    /// - `CoreError::Store` if the query fails
    fn get(&self, id: RequestId) -> impl Future<Output = Result<AccountRequest>> + Send;

    /// Find the request for `email` whose status is non-terminal, if any.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the query fails.
    fn find_active_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<AccountRequest>>> + Send;

    /// Find the request for `email` in exactly `status`, if any.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the query fails.
    fn find_by_email_and_status(
        &self,
        email: &str,
        status: RequestStatus,
    ) -> impl Future<Output = Result<Option<AccountRequest>>> + Send;

    /// List all requests in `status`, ordered by `request_date` ascending.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the query fails.
    fn list_by_status(
        &self,
        status: RequestStatus,
    ) -> impl Future<Output = Result<Vec<AccountRequest>>> + Send;

    /// Conditionally replace a request record.
    ///
    /// `updated.version` must equal the currently stored version; the
    /// store persists `updated` with the version incremented and returns
    /// the stored record. This is the compare-and-swap primitive backing
    /// every status transition.
    ///
    /// # Errors
    ///
    /// - `CoreError::StaleState` if the stored version differs
    /// - `CoreError::NotFound` if the record no longer exists
    /// - `CoreError::Store` if the write fails
    fn update_if_version(
        &self,
        updated: &AccountRequest,
    ) -> impl Future<Output = Result<AccountRequest>> + Send;
}
