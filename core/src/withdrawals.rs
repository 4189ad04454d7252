//! Withdrawal scheduling and auto-processing.
//!
//! The processor wakes on a fixed interval, claims each due record with
//! a conditional write, and only then attempts the debit. The claim
//! flips `debited` before money moves, so even a tick overlapping a
//! slow previous run can never select the same record twice; a record
//! stuck mid-claim after a crash needs manual reconciliation rather
//! than risking a double payment.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::config::WithdrawalConfig;
use crate::error::{CoreError, Result};
use crate::providers::{PaymentProvider, WithdrawalStore};
use crate::state::{PaymentOperator, WithdrawalId, WithdrawalRequest, WithdrawalStatus};

/// Outcome of one processor tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Records debited and marked `Processed` this tick.
    pub processed: Vec<WithdrawalId>,
    /// Records whose debit failed, marked `Failed` this tick.
    pub failed: Vec<WithdrawalId>,
    /// Due records skipped because another writer claimed them first.
    pub skipped: usize,
}

/// Withdrawal service: scheduling plus the per-tick processing pass.
#[derive(Debug, Clone)]
pub struct WithdrawalService<W, P> {
    store: W,
    payment: P,
    config: WithdrawalConfig,
}

impl<W, P> WithdrawalService<W, P>
where
    W: WithdrawalStore + Clone,
    P: PaymentProvider + Clone,
{
    /// Create a withdrawal service.
    pub const fn new(store: W, payment: P, config: WithdrawalConfig) -> Self {
        Self {
            store,
            payment,
            config,
        }
    }

    /// Schedule a withdrawal.
    ///
    /// `scheduled_at` defaults to now, making the record due on the
    /// next tick.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if the amount is not a
    /// positive finite number or the destination is empty.
    pub async fn schedule(
        &self,
        amount: f64,
        destination_phone: &str,
        operator: PaymentOperator,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<WithdrawalRequest> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::InvalidInput {
                reason: "amount must be a positive number".to_string(),
            });
        }
        if destination_phone.trim().is_empty() {
            return Err(CoreError::InvalidInput {
                reason: "destination phone must not be empty".to_string(),
            });
        }

        let withdrawal = WithdrawalRequest::new(
            amount,
            destination_phone.trim().to_string(),
            operator,
            scheduled_at.unwrap_or_else(Utc::now),
        );
        let stored = self.store.insert(&withdrawal).await?;

        info!(
            withdrawal_id = %stored.id,
            operator = %stored.operator,
            scheduled_at = %stored.scheduled_at,
            "withdrawal scheduled"
        );

        Ok(stored)
    }

    /// Get a withdrawal by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no record exists.
    pub async fn get(&self, id: WithdrawalId) -> Result<WithdrawalRequest> {
        self.store.get(id).await
    }

    /// Process every record due at `now`.
    ///
    /// Each record is claimed, debited once, and marked `Processed` or
    /// `Failed`. A failed debit does not abort the batch, and failed
    /// records are not retried within the same tick.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] only if the due-record query itself
    /// fails; per-record failures are reported in the [`TickReport`].
    pub async fn process_due(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let due = self.store.list_due(now).await?;
        let mut report = TickReport::default();

        for withdrawal in due {
            // Claim before debiting: flip the double-debit guard under
            // a version check. Losing the claim means another run owns
            // this record.
            let mut claim = withdrawal.clone();
            claim.debited = true;
            let claimed = match self.store.update_if_version(&claim).await {
                Ok(stored) => stored,
                Err(CoreError::StaleState | CoreError::NotFound) => {
                    report.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.debit_with_timeout(&claimed).await {
                Ok(()) => {
                    let mut done = claimed.clone();
                    done.status = WithdrawalStatus::Processed;
                    self.store.update_if_version(&done).await?;
                    info!(withdrawal_id = %done.id, "withdrawal processed");
                    report.processed.push(done.id);
                }
                Err(error) => {
                    // Release the guard: no money moved for this record.
                    let mut failed = claimed.clone();
                    failed.status = WithdrawalStatus::Failed;
                    failed.debited = false;
                    self.store.update_if_version(&failed).await?;
                    warn!(
                        withdrawal_id = %failed.id,
                        error = %error,
                        "withdrawal debit failed"
                    );
                    report.failed.push(failed.id);
                }
            }
        }

        Ok(report)
    }

    async fn debit_with_timeout(&self, withdrawal: &WithdrawalRequest) -> Result<()> {
        let debit = self.payment.debit(
            withdrawal.operator,
            &withdrawal.destination_phone,
            withdrawal.amount,
        );
        match tokio::time::timeout(self.config.debit_timeout, debit).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::CollaboratorUnavailable {
                collaborator: "payment".to_string(),
            }),
        }
    }
}

/// Background withdrawal processor.
///
/// Owns the recurring tick and guarantees that two tick passes never
/// run concurrently in this process (single-flight lock); the store's
/// conditional claims cover overlap across processes.
#[derive(Debug, Clone)]
pub struct WithdrawalProcessor<W, P> {
    service: WithdrawalService<W, P>,
    tick_interval: std::time::Duration,
    in_flight: Arc<Mutex<()>>,
}

impl<W, P> WithdrawalProcessor<W, P>
where
    W: WithdrawalStore + Clone + 'static,
    P: PaymentProvider + Clone + 'static,
{
    /// Create a processor over a withdrawal service.
    pub fn new(service: WithdrawalService<W, P>, config: &WithdrawalConfig) -> Self {
        Self {
            service,
            tick_interval: config.tick_interval,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// The underlying service, for scheduling and lookups.
    #[must_use]
    pub const fn service(&self) -> &WithdrawalService<W, P> {
        &self.service
    }

    /// Run one tick now, unless one is already in flight.
    ///
    /// Returns `Ok(None)` when skipped because a tick is running.
    ///
    /// # Errors
    ///
    /// Propagates [`CoreError::Store`] from the due-record query.
    pub async fn tick_now(&self) -> Result<Option<TickReport>> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            info!("withdrawal tick skipped; previous tick still running");
            return Ok(None);
        };
        let report = self.service.process_due(Utc::now()).await?;
        Ok(Some(report))
    }

    /// Run the recurring tick loop until `shutdown` signals.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(error) = self.tick_now().await {
                        warn!(error = %error, "withdrawal tick failed");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("withdrawal processor shutting down");
                        return;
                    }
                }
            }
        }
    }
}
