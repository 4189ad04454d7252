//! Mock payment provider for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{CoreError, Result};
use crate::providers::PaymentProvider;
use crate::state::PaymentOperator;

/// A debit captured by [`MockPaymentProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDebit {
    /// Operator the debit was routed through.
    pub operator: PaymentOperator,
    /// Destination number.
    pub destination_phone: String,
    /// Debited amount.
    pub amount: f64,
}

/// Mock payment provider.
///
/// Records every debit, can be switched into failure mode, and can
/// simulate a slow operator API to exercise the debit timeout.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentProvider {
    debits: Arc<Mutex<Vec<RecordedDebit>>>,
    failing: Arc<AtomicBool>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockPaymentProvider {
    /// Create a new mock payment provider that succeeds immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch failure mode on or off.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delay every debit call by `delay` before responding.
    pub fn set_delay(&self, delay: Option<Duration>) {
        if let Ok(mut d) = self.delay.lock() {
            *d = delay;
        }
    }

    /// All debits recorded so far, in call order.
    #[must_use]
    pub fn debits(&self) -> Vec<RecordedDebit> {
        self.debits.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Number of debits recorded for one destination number.
    #[must_use]
    pub fn debit_count_for(&self, destination_phone: &str) -> usize {
        self.debits()
            .iter()
            .filter(|d| d.destination_phone == destination_phone)
            .count()
    }
}

impl PaymentProvider for MockPaymentProvider {
    async fn debit(
        &self,
        operator: PaymentOperator,
        destination_phone: &str,
        amount: f64,
    ) -> Result<()> {
        let delay = self.delay.lock().ok().and_then(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::CollaboratorUnavailable {
                collaborator: "payment".to_string(),
            });
        }
        if let Ok(mut debits) = self.debits.lock() {
            debits.push(RecordedDebit {
                operator,
                destination_phone: destination_phone.to_string(),
                amount,
            });
        }
        Ok(())
    }
}
