//! Mock providers for testing.
//!
//! Enabled by the `test-utils` feature (on by default). These simulate
//! the email and payment collaborators with recording and programmable
//! failure, so lifecycle tests run at memory speed.

mod email;
mod payment;

pub use email::{MockEmailProvider, SentEmail};
pub use payment::{MockPaymentProvider, RecordedDebit};
