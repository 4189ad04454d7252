//! Console payment provider for development.

use tracing::info;

use crate::error::Result;
use crate::providers::PaymentProvider;
use crate::state::PaymentOperator;

/// Console payment provider.
///
/// Logs debits instead of calling an operator API. Useful for
/// development where you don't want to move real money.
#[derive(Clone, Debug, Default)]
pub struct ConsolePaymentProvider;

impl ConsolePaymentProvider {
    /// Create a new console payment provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PaymentProvider for ConsolePaymentProvider {
    async fn debit(
        &self,
        operator: PaymentOperator,
        destination_phone: &str,
        amount: f64,
    ) -> Result<()> {
        info!(
            operator = %operator,
            destination = %destination_phone,
            amount = %amount,
            "💸 Debit (Development Mode)"
        );
        Ok(())
    }
}
