//! Error types for the account-request and withdrawal lifecycle.

use thiserror::Error;

use crate::state::RequestStatus;

/// Result type alias for core lifecycle operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error taxonomy for the backoffice core.
///
/// Every failure mode of the lifecycle services maps onto one of these
/// variants; the web layer translates them 1:1 into HTTP statuses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ═══════════════════════════════════════════════════════════
    // State Errors
    // ═══════════════════════════════════════════════════════════

    /// A non-terminal request already exists for this email.
    #[error("An active request already exists for this email")]
    Conflict,

    /// Record missing, or not in the state the operation requires.
    #[error("Record not found")]
    NotFound,

    /// The requested status transition is not defined.
    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Status the record was in.
        from: RequestStatus,
        /// Status the caller asked for.
        to: RequestStatus,
    },

    /// A conditional write lost against a concurrent mutation.
    #[error("Record was modified concurrently")]
    StaleState,

    // ═══════════════════════════════════════════════════════════
    // Credential Errors
    // ═══════════════════════════════════════════════════════════

    /// Supplied temporary credential does not match the stored one.
    #[error("Invalid credential")]
    InvalidCredential,

    /// New permanent credential fails the minimum-strength policy.
    #[error("Credential too weak: {reason}")]
    WeakCredential {
        /// Which policy rule was violated.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Input Errors
    // ═══════════════════════════════════════════════════════════

    /// Request body failed boundary validation.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Which field or rule was violated.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// An external collaborator (email, payment) is unreachable.
    #[error("Collaborator unavailable: {collaborator}")]
    CollaboratorUnavailable {
        /// Which collaborator failed.
        collaborator: String,
    },

    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Unexpected internal failure (should not be exposed to users).
    #[error("Internal error")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if this error is due to invalid caller input or
    /// caller-visible state, as opposed to a system failure.
    ///
    /// # Examples
    ///
    /// ```
    /// # use backoffice_core::error::CoreError;
    /// assert!(CoreError::Conflict.is_user_error());
    /// assert!(!CoreError::Store("down".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Conflict
                | Self::NotFound
                | Self::InvalidTransition { .. }
                | Self::StaleState
                | Self::InvalidCredential
                | Self::WeakCredential { .. }
                | Self::InvalidInput { .. }
        )
    }

    /// Returns `true` if retrying the same call later could succeed
    /// without any state change by the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StaleState | Self::CollaboratorUnavailable { .. } | Self::Store(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified() {
        assert!(CoreError::InvalidCredential.is_user_error());
        assert!(
            CoreError::WeakCredential {
                reason: "too short".to_string()
            }
            .is_user_error()
        );
        assert!(
            !CoreError::CollaboratorUnavailable {
                collaborator: "email".to_string()
            }
            .is_user_error()
        );
    }

    #[test]
    fn stale_state_is_retryable() {
        assert!(CoreError::StaleState.is_retryable());
        assert!(!CoreError::NotFound.is_retryable());
    }
}
