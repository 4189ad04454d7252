//! # Backoffice Core
//!
//! Account-request lifecycle, first-login credential exchange, and
//! withdrawal auto-processing.
//!
//! ## Lifecycle
//!
//! ```text
//! pending --(admin approves)--> approved --(first-login exchange)--> completed
//! pending --(admin rejects)---> rejected [terminal]
//! ```
//!
//! A requester submits an email; an administrator approves or rejects
//! the pending request. Approval mints a one-time temporary credential
//! that is emailed out and consumed exactly once by the first-login
//! exchange, which stores a hashed permanent credential and activates
//! the account. Independently, a timer-driven processor debits due
//! withdrawal records.
//!
//! ## Design
//!
//! - Every status transition is a version-keyed conditional write
//!   (compare-and-swap), so concurrent administrative actions resolve
//!   to one winner and one `StaleState` loser.
//! - Notification delivery is best-effort and never rolls back a
//!   committed transition.
//! - External collaborators (document store, email, payment) are
//!   abstracted behind the traits in [`providers`]; in-memory store
//!   implementations live in [`stores`].

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod credential;
pub mod environment;
pub mod error;
pub mod exchange;
pub mod notify;
pub mod providers;
pub mod requests;
pub mod state;
pub mod stores;
pub mod utils;
pub mod withdrawals;

// Mock providers for testing
#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use config::{CredentialPolicy, WithdrawalConfig};
pub use environment::Environment;
pub use error::{CoreError, Result};
pub use exchange::ExchangeService;
pub use notify::{NotificationDispatcher, NotificationOutcome};
pub use requests::{AdminContext, RequestService};
pub use state::{
    Account, AccountId, AccountRequest, PaymentOperator, RequestId, RequestStatus, WithdrawalId,
    WithdrawalRequest, WithdrawalStatus,
};
pub use withdrawals::{TickReport, WithdrawalProcessor, WithdrawalService};
