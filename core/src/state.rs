//! Domain state types for the account-request and withdrawal lifecycle.
//!
//! All types are `Clone` and serde-serializable so they can cross the
//! store and HTTP boundaries as plain values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for an account request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub uuid::Uuid);

impl RequestId {
    /// Generate a new random `RequestId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub uuid::Uuid);

impl AccountId {
    /// Generate a new random `AccountId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a withdrawal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawalId(pub uuid::Uuid);

impl WithdrawalId {
    /// Generate a new random `WithdrawalId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for WithdrawalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WithdrawalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Account Requests
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle status of an account request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted, awaiting an administrative decision.
    Pending,
    /// Approved; a temporary credential has been issued.
    Approved,
    /// Rejected by an administrator. Terminal.
    Rejected,
    /// First login completed, account activated. Terminal.
    Completed,
}

impl RequestStatus {
    /// Returns `true` if no further transition is defined from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    /// Returns `true` if `target` is a legal next status.
    ///
    /// Legal transitions:
    ///
    /// ```text
    /// pending  -> approved | rejected
    /// approved -> completed
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::Completed)
        )
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// An account request record.
///
/// At most one request with a non-terminal status may exist per email;
/// the store enforces this at insert time. `version` is the optimistic
/// concurrency token: every mutation goes through a conditional write
/// that checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRequest {
    /// Unique identifier, assigned at creation, immutable.
    pub id: RequestId,

    /// Business key. Lowercased at the boundary.
    pub email: String,

    /// Current lifecycle status.
    pub status: RequestStatus,

    /// One-time secret, present only while `status` is `Pending` or
    /// `Approved` (minted on approval, cleared on completion).
    pub temporary_credential: Option<String>,

    /// Submission timestamp.
    pub request_date: DateTime<Utc>,

    /// Set exactly once, on the transition out of `Pending`.
    pub processed_date: Option<DateTime<Utc>>,

    /// Optimistic concurrency token, incremented on every write.
    pub version: u64,
}

impl AccountRequest {
    /// Create a fresh pending request for `email`.
    #[must_use]
    pub fn new(email: String, now: DateTime<Utc>) -> Self {
        Self {
            id: RequestId::new(),
            email,
            status: RequestStatus::Pending,
            temporary_credential: None,
            request_date: now,
            processed_date: None,
            version: 0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Accounts
// ═══════════════════════════════════════════════════════════════════════

/// A user account created by the request lifecycle.
///
/// Inactive until first-login exchange completes. Profile fields are
/// owned by unrelated application features after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,

    /// Account email, matches the originating request.
    pub email: String,

    /// Display name, filled in later by profile features.
    pub display_name: Option<String>,

    /// Contact phone, filled in later by profile features.
    pub phone: Option<String>,

    /// BCP 47 locale tag.
    pub locale: Option<String>,

    /// Argon2 hash of the permanent credential. `None` until first login.
    pub credential_hash: Option<String>,

    /// `false` until first-login exchange completes.
    pub active: bool,
}

impl Account {
    /// Create an inactive account shell for `email`.
    #[must_use]
    pub fn new(email: String) -> Self {
        Self {
            id: AccountId::new(),
            email,
            display_name: None,
            phone: None,
            locale: None,
            credential_hash: None,
            active: false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Withdrawals
// ═══════════════════════════════════════════════════════════════════════

/// Supported mobile-money payment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOperator {
    /// Orange Money.
    OrangeMoney,
    /// MTN Mobile Money.
    MtnMomo,
    /// Wave.
    Wave,
}

impl std::fmt::Display for PaymentOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OrangeMoney => "orange_money",
            Self::MtnMomo => "mtn_momo",
            Self::Wave => "wave",
        };
        f.write_str(s)
    }
}

/// Lifecycle status of a withdrawal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Scheduled, awaiting the processor.
    Pending,
    /// Debit succeeded. Terminal.
    Processed,
    /// Debit failed. Terminal for the processor (manual follow-up).
    Failed,
}

/// A scheduled withdrawal.
///
/// `debited` may transition `false -> true` at most once per record;
/// the processor's conditional claim enforces this even across
/// overlapping ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Unique identifier.
    pub id: WithdrawalId,

    /// Positive amount, currency-agnostic.
    pub amount: f64,

    /// Mobile-money destination number.
    pub destination_phone: String,

    /// Operator handling the debit.
    pub operator: PaymentOperator,

    /// Current processing status.
    pub status: WithdrawalStatus,

    /// Earliest time at which the processor may pick this record up.
    pub scheduled_at: DateTime<Utc>,

    /// Double-debit guard; set together with `status = Processed`.
    pub debited: bool,

    /// Optimistic concurrency token, incremented on every write.
    pub version: u64,
}

impl WithdrawalRequest {
    /// Create a pending withdrawal scheduled for `scheduled_at`.
    #[must_use]
    pub fn new(
        amount: f64,
        destination_phone: String,
        operator: PaymentOperator,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: WithdrawalId::new(),
            amount,
            destination_phone,
            operator,
            status: WithdrawalStatus::Pending,
            scheduled_at,
            debited: false,
            version: 0,
        }
    }

    /// Returns `true` if the processor should pick this record up at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == WithdrawalStatus::Pending && !self.debited && self.scheduled_at <= now
    }
}
