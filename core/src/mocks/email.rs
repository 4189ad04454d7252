//! Mock email provider for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{CoreError, Result};
use crate::providers::EmailProvider;

/// An email captured by [`MockEmailProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub to: String,
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// Mock email provider.
///
/// Records every send instead of delivering, and can be switched into
/// failure mode to exercise the non-fatal dispatch path.
#[derive(Debug, Clone, Default)]
pub struct MockEmailProvider {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    failing: Arc<AtomicBool>,
}

impl MockEmailProvider {
    /// Create a new mock email provider that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch failure mode on or off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All emails recorded so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Emails recorded for one recipient.
    #[must_use]
    pub fn sent_to(&self, to: &str) -> Vec<SentEmail> {
        self.sent()
            .into_iter()
            .filter(|e| e.to == to)
            .collect()
    }
}

impl EmailProvider for MockEmailProvider {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::CollaboratorUnavailable {
                collaborator: "email".to_string(),
            });
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        }
        Ok(())
    }
}
