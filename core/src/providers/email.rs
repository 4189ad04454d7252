//! Email provider trait.

use std::future::Future;

use crate::error::Result;

/// Email provider.
///
/// This trait abstracts over transactional email services (SendGrid,
/// AWS SES, Postmark, etc.). Delivery is best-effort: callers must not
/// let a send failure roll back already-committed state.
pub trait EmailProvider: Send + Sync {
    /// Send a transactional email.
    ///
    /// # Arguments
    ///
    /// - `to`: Recipient email address
    /// - `subject`: Message subject
    /// - `body`: Plain-text message body
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Email provider rejects the request
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}
