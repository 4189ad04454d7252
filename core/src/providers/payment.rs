//! Payment provider trait.

use std::future::Future;

use crate::error::Result;
use crate::state::PaymentOperator;

/// Payment operator gateway.
///
/// This trait abstracts over the mobile-money APIs that execute
/// withdrawal debits. Callers bound each call with a timeout; the
/// gateway itself has no retry obligations.
pub trait PaymentProvider: Send + Sync {
    /// Debit `amount` towards `destination_phone` via `operator`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The operator API is unreachable
    /// - The operator rejects the debit
    fn debit(
        &self,
        operator: PaymentOperator,
        destination_phone: &str,
        amount: f64,
    ) -> impl Future<Output = Result<()>> + Send;
}
