//! Lifecycle configuration.
//!
//! Configuration values are provided by the application, not hardcoded
//! inside the services.

use std::time::Duration;

use crate::error::{CoreError, Result};

/// Withdrawal auto-processor configuration.
#[derive(Debug, Clone)]
pub struct WithdrawalConfig {
    /// Interval between processor ticks.
    ///
    /// Default: 60 seconds
    pub tick_interval: Duration,

    /// Upper bound on a single debit call to the payment collaborator.
    ///
    /// Default: 10 seconds
    pub debit_timeout: Duration,
}

impl WithdrawalConfig {
    /// Create a new withdrawal configuration with default timings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            debit_timeout: Duration::from_secs(10),
        }
    }

    /// Set the tick interval.
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the debit timeout.
    #[must_use]
    pub const fn with_debit_timeout(mut self, timeout: Duration) -> Self {
        self.debit_timeout = timeout;
        self
    }
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum-strength policy for permanent credentials.
#[derive(Debug, Clone)]
pub struct CredentialPolicy {
    /// Minimum credential length in characters.
    ///
    /// Default: 8
    pub min_length: usize,
}

impl CredentialPolicy {
    /// Create a new credential policy with the default minimum length.
    #[must_use]
    pub const fn new() -> Self {
        Self { min_length: 8 }
    }

    /// Set the minimum length.
    #[must_use]
    pub const fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Validate a candidate permanent credential against this policy.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::WeakCredential`] naming the violated rule.
    pub fn validate(&self, credential: &str) -> Result<()> {
        if credential.is_empty() {
            return Err(CoreError::WeakCredential {
                reason: "credential must not be empty".to_string(),
            });
        }
        if credential.chars().count() < self.min_length {
            return Err(CoreError::WeakCredential {
                reason: format!("credential must be at least {} characters", self.min_length),
            });
        }
        Ok(())
    }
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self::new()
    }
}
