//! Notification dispatch on lifecycle transitions.
//!
//! One notification-intent per committed status change. Delivery is
//! best-effort: the state transition has already committed by the time
//! dispatch runs, so a send failure is logged and reported to the
//! caller as a warning, never as an operation failure.

use tracing::{info, warn};

use crate::providers::EmailProvider;
use crate::state::RequestStatus;

/// Outcome of a notification dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The email provider accepted the message.
    Delivered,
    /// The email provider failed; the state change stands regardless.
    Failed,
}

impl NotificationOutcome {
    /// Returns `true` if the provider accepted the message.
    #[must_use]
    pub const fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Notification dispatcher.
///
/// Formats one transactional email per request-status change and hands
/// it to the email collaborator.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher<E> {
    email: E,
}

impl<E> NotificationDispatcher<E>
where
    E: EmailProvider + Clone,
{
    /// Create a dispatcher over an email provider.
    pub const fn new(email: E) -> Self {
        Self { email }
    }

    /// Dispatch the notification for a request entering `new_status`.
    ///
    /// `temporary_credential` is included in the body only for the
    /// approval notification.
    pub async fn dispatch(
        &self,
        email: &str,
        new_status: RequestStatus,
        temporary_credential: Option<&str>,
    ) -> NotificationOutcome {
        let (subject, body) = compose(new_status, temporary_credential);

        match self.email.send(email, subject, &body).await {
            Ok(()) => {
                info!(to = %email, status = %new_status, "notification dispatched");
                NotificationOutcome::Delivered
            }
            Err(error) => {
                warn!(
                    to = %email,
                    status = %new_status,
                    error = %error,
                    "notification dispatch failed; state transition already committed"
                );
                NotificationOutcome::Failed
            }
        }
    }
}

fn compose(new_status: RequestStatus, temporary_credential: Option<&str>) -> (&'static str, String) {
    match new_status {
        RequestStatus::Pending => (
            "Your account request was received",
            "We received your account request. You will be notified once it \
             has been reviewed."
                .to_string(),
        ),
        RequestStatus::Approved => {
            let credential = temporary_credential.unwrap_or_default();
            (
                "Your account request was approved",
                format!(
                    "Your account request was approved.\n\n\
                     Temporary password: {credential}\n\n\
                     Sign in with it once and choose a permanent password. \
                     The temporary password stops working after first use."
                ),
            )
        }
        RequestStatus::Rejected => (
            "Your account request was declined",
            "Your account request was reviewed and declined. Contact support \
             if you believe this is a mistake."
                .to_string(),
        ),
        RequestStatus::Completed => (
            "Your account is active",
            "Your password was set and your account is now active.".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockEmailProvider;

    #[tokio::test]
    async fn approval_notification_contains_credential() {
        let email = MockEmailProvider::new();
        let dispatcher = NotificationDispatcher::new(email.clone());

        let outcome = dispatcher
            .dispatch("alice@example.com", RequestStatus::Approved, Some("aB3!xYz9kLmN2pQ&"))
            .await;

        assert!(outcome.is_delivered());
        let sent = email.sent_to("alice@example.com");
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("aB3!xYz9kLmN2pQ&"));
    }

    #[tokio::test]
    async fn dispatch_failure_is_non_fatal() {
        let email = MockEmailProvider::new();
        email.set_failing(true);
        let dispatcher = NotificationDispatcher::new(email.clone());

        let outcome = dispatcher
            .dispatch("alice@example.com", RequestStatus::Rejected, None)
            .await;

        assert_eq!(outcome, NotificationOutcome::Failed);
        assert!(email.sent().is_empty());
    }
}
