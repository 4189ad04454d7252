//! Collaborator contracts consumed by the lifecycle services.
//!
//! Each trait abstracts over one external dependency: the document store
//! (by-id and by-equality access plus conditional writes), the email
//! sender, and the payment operator gateway. Production deployments
//! implement these against hosted services; the crate ships in-memory
//! store implementations (`stores::memory`) and a console email provider
//! for development.

mod account_store;
mod console_email;
mod console_payment;
mod email;
mod payment;
mod request_store;
mod withdrawal_store;

pub use account_store::AccountStore;
pub use console_email::ConsoleEmailProvider;
pub use console_payment::ConsolePaymentProvider;
pub use email::EmailProvider;
pub use payment::PaymentProvider;
pub use request_store::RequestStore;
pub use withdrawal_store::WithdrawalStore;
