//! Lifecycle environment.
//!
//! Bundles every external dependency the lifecycle services need, for
//! dependency injection at the application boundary.

use crate::config::{CredentialPolicy, WithdrawalConfig};
use crate::exchange::ExchangeService;
use crate::providers::{AccountStore, EmailProvider, PaymentProvider, RequestStore, WithdrawalStore};
use crate::requests::RequestService;
use crate::withdrawals::{WithdrawalProcessor, WithdrawalService};

/// Lifecycle environment.
///
/// # Type Parameters
///
/// - `RS`: Request store
/// - `AS`: Account store
/// - `WS`: Withdrawal store
/// - `E`: Email provider
/// - `P`: Payment provider
#[derive(Clone)]
pub struct Environment<RS, AS, WS, E, P>
where
    RS: RequestStore + Clone,
    AS: AccountStore + Clone,
    WS: WithdrawalStore + Clone,
    E: EmailProvider + Clone,
    P: PaymentProvider + Clone,
{
    /// Account-request store (hosted document DB).
    pub requests: RS,

    /// Account store (hosted document DB).
    pub accounts: AS,

    /// Withdrawal store (hosted document DB).
    pub withdrawals: WS,

    /// Email collaborator (best-effort notification delivery).
    pub email: E,

    /// Payment collaborator (withdrawal debits).
    pub payment: P,

    /// Processor timings.
    pub withdrawal_config: WithdrawalConfig,

    /// Permanent-credential strength policy.
    pub credential_policy: CredentialPolicy,
}

impl<RS, AS, WS, E, P> Environment<RS, AS, WS, E, P>
where
    RS: RequestStore + Clone,
    AS: AccountStore + Clone,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone,
    P: PaymentProvider + Clone + 'static,
{
    /// Create an environment from its providers and configuration.
    pub const fn new(
        requests: RS,
        accounts: AS,
        withdrawals: WS,
        email: E,
        payment: P,
        withdrawal_config: WithdrawalConfig,
        credential_policy: CredentialPolicy,
    ) -> Self {
        Self {
            requests,
            accounts,
            withdrawals,
            email,
            payment,
            withdrawal_config,
            credential_policy,
        }
    }

    /// Build the account-request service.
    #[must_use]
    pub fn request_service(&self) -> RequestService<RS, E> {
        RequestService::new(self.requests.clone(), self.email.clone())
    }

    /// Build the first-login exchange service.
    #[must_use]
    pub fn exchange_service(&self) -> ExchangeService<RS, AS, E> {
        ExchangeService::new(
            self.requests.clone(),
            self.accounts.clone(),
            self.email.clone(),
            self.credential_policy.clone(),
        )
    }

    /// Build the withdrawal service.
    #[must_use]
    pub fn withdrawal_service(&self) -> WithdrawalService<WS, P> {
        WithdrawalService::new(
            self.withdrawals.clone(),
            self.payment.clone(),
            self.withdrawal_config.clone(),
        )
    }

    /// Build the background withdrawal processor.
    #[must_use]
    pub fn withdrawal_processor(&self) -> WithdrawalProcessor<WS, P> {
        WithdrawalProcessor::new(self.withdrawal_service(), &self.withdrawal_config)
    }
}
