//! Application state for Axum handlers.

use backoffice_core::providers::{
    AccountStore, EmailProvider, PaymentProvider, RequestStore, WithdrawalStore,
};
use backoffice_core::{
    Environment, ExchangeService, RequestService, WithdrawalProcessor,
};

/// Application state shared across all HTTP handlers.
///
/// Holds one instance of each lifecycle service, built from the same
/// [`Environment`] the server binary uses to run the background
/// withdrawal processor.
///
/// # Type Parameters
///
/// - `RS`: Request store
/// - `AS`: Account store
/// - `WS`: Withdrawal store
/// - `E`: Email provider
/// - `P`: Payment provider
#[derive(Clone)]
pub struct AppState<RS, AS, WS, E, P>
where
    RS: RequestStore + Clone,
    AS: AccountStore + Clone,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone,
    P: PaymentProvider + Clone + 'static,
{
    /// Account-request service.
    pub requests: RequestService<RS, E>,

    /// First-login exchange service.
    pub exchange: ExchangeService<RS, AS, E>,

    /// Withdrawal processor (shares its single-flight guard with the
    /// background loop, so a manual tick cannot overlap it).
    pub withdrawals: WithdrawalProcessor<WS, P>,
}

impl<RS, AS, WS, E, P> AppState<RS, AS, WS, E, P>
where
    RS: RequestStore + Clone,
    AS: AccountStore + Clone,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone,
    P: PaymentProvider + Clone + 'static,
{
    /// Build the state from an environment.
    ///
    /// Pass the same `WithdrawalProcessor` instance to the background
    /// loop so manual and scheduled ticks share the single-flight
    /// guard.
    #[must_use]
    pub fn new(env: &Environment<RS, AS, WS, E, P>, withdrawals: WithdrawalProcessor<WS, P>) -> Self {
        Self {
            requests: env.request_service(),
            exchange: env.exchange_service(),
            withdrawals,
        }
    }
}
