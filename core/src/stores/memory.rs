//! In-memory store implementations.
//!
//! These back the development server and the test suite. Conditional
//! writes hold the map lock for the whole compare-then-write, which
//! gives them the same atomicity a hosted document store provides
//! through versioned writes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::error::{CoreError, Result};
use crate::providers::{AccountStore, RequestStore, WithdrawalStore};
use crate::state::{
    Account, AccountId, AccountRequest, RequestId, RequestStatus, WithdrawalId, WithdrawalRequest,
};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| CoreError::Store("store lock poisoned".to_string()))
}

// ═══════════════════════════════════════════════════════════════════════
// Account Requests
// ═══════════════════════════════════════════════════════════════════════

/// In-memory account-request store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRequestStore {
    requests: Arc<Mutex<HashMap<RequestId, AccountRequest>>>,
}

impl MemoryRequestStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequestStore for MemoryRequestStore {
    async fn insert(&self, request: &AccountRequest) -> Result<AccountRequest> {
        let mut requests = lock(&self.requests)?;
        let duplicate = requests
            .values()
            .any(|r| r.email == request.email && !r.status.is_terminal());
        if duplicate {
            return Err(CoreError::Conflict);
        }
        requests.insert(request.id, request.clone());
        Ok(request.clone())
    }

    async fn get(&self, id: RequestId) -> Result<AccountRequest> {
        lock(&self.requests)?
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound)
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<AccountRequest>> {
        Ok(lock(&self.requests)?
            .values()
            .find(|r| r.email == email && !r.status.is_terminal())
            .cloned())
    }

    async fn find_by_email_and_status(
        &self,
        email: &str,
        status: RequestStatus,
    ) -> Result<Option<AccountRequest>> {
        Ok(lock(&self.requests)?
            .values()
            .find(|r| r.email == email && r.status == status)
            .cloned())
    }

    async fn list_by_status(&self, status: RequestStatus) -> Result<Vec<AccountRequest>> {
        let mut matching: Vec<AccountRequest> = lock(&self.requests)?
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.request_date);
        Ok(matching)
    }

    async fn update_if_version(&self, updated: &AccountRequest) -> Result<AccountRequest> {
        let mut requests = lock(&self.requests)?;
        let current = requests.get(&updated.id).ok_or(CoreError::NotFound)?;
        if current.version != updated.version {
            return Err(CoreError::StaleState);
        }
        let mut stored = updated.clone();
        stored.version += 1;
        requests.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Accounts
// ═══════════════════════════════════════════════════════════════════════

/// In-memory account store.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryAccountStore {
    async fn upsert(&self, account: &Account) -> Result<Account> {
        lock(&self.accounts)?.insert(account.id, account.clone());
        Ok(account.clone())
    }

    async fn get(&self, id: AccountId) -> Result<Account> {
        lock(&self.accounts)?
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(lock(&self.accounts)?
            .values()
            .find(|a| a.email == email)
            .cloned())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Withdrawals
// ═══════════════════════════════════════════════════════════════════════

/// In-memory withdrawal store.
#[derive(Debug, Clone, Default)]
pub struct MemoryWithdrawalStore {
    withdrawals: Arc<Mutex<HashMap<WithdrawalId, WithdrawalRequest>>>,
}

impl MemoryWithdrawalStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WithdrawalStore for MemoryWithdrawalStore {
    async fn insert(&self, withdrawal: &WithdrawalRequest) -> Result<WithdrawalRequest> {
        lock(&self.withdrawals)?.insert(withdrawal.id, withdrawal.clone());
        Ok(withdrawal.clone())
    }

    async fn get(&self, id: WithdrawalId) -> Result<WithdrawalRequest> {
        lock(&self.withdrawals)?
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound)
    }

    async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<WithdrawalRequest>> {
        let mut due: Vec<WithdrawalRequest> = lock(&self.withdrawals)?
            .values()
            .filter(|w| w.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|w| w.scheduled_at);
        Ok(due)
    }

    async fn update_if_version(&self, updated: &WithdrawalRequest) -> Result<WithdrawalRequest> {
        let mut withdrawals = lock(&self.withdrawals)?;
        let current = withdrawals.get(&updated.id).ok_or(CoreError::NotFound)?;
        if current.version != updated.version {
            return Err(CoreError::StaleState);
        }
        let mut stored = updated.clone();
        stored.version += 1;
        withdrawals.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::state::WithdrawalStatus;

    #[tokio::test]
    async fn insert_rejects_second_active_request_for_email() {
        let store = MemoryRequestStore::new();
        let now = Utc::now();
        let first = AccountRequest::new("alice@example.com".to_string(), now);
        store.insert(&first).await.unwrap();

        let second = AccountRequest::new("alice@example.com".to_string(), now);
        assert_eq!(store.insert(&second).await, Err(CoreError::Conflict));
    }

    #[tokio::test]
    async fn insert_allows_new_request_after_terminal_status() {
        let store = MemoryRequestStore::new();
        let now = Utc::now();
        let mut first = AccountRequest::new("alice@example.com".to_string(), now);
        store.insert(&first).await.unwrap();

        first.status = RequestStatus::Rejected;
        store.update_if_version(&first).await.unwrap();

        let second = AccountRequest::new("alice@example.com".to_string(), now);
        assert!(store.insert(&second).await.is_ok());
    }

    #[tokio::test]
    async fn conditional_write_detects_stale_version() {
        let store = MemoryRequestStore::new();
        let request = AccountRequest::new("bob@example.com".to_string(), Utc::now());
        store.insert(&request).await.unwrap();

        // First writer wins.
        let mut winner = request.clone();
        winner.status = RequestStatus::Approved;
        let stored = store.update_if_version(&winner).await.unwrap();
        assert_eq!(stored.version, request.version + 1);

        // Second writer started from the same snapshot and loses.
        let mut loser = request;
        loser.status = RequestStatus::Rejected;
        assert_eq!(
            store.update_if_version(&loser).await,
            Err(CoreError::StaleState)
        );
    }

    #[tokio::test]
    async fn list_by_status_orders_by_request_date() {
        let store = MemoryRequestStore::new();
        let now = Utc::now();
        let older = AccountRequest::new("a@example.com".to_string(), now - chrono::Duration::hours(2));
        let newer = AccountRequest::new("b@example.com".to_string(), now);
        store.insert(&newer).await.unwrap();
        store.insert(&older).await.unwrap();

        let listed = store.list_by_status(RequestStatus::Pending).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].email, "a@example.com");
        assert_eq!(listed[1].email, "b@example.com");
    }

    #[tokio::test]
    async fn due_listing_excludes_future_and_debited() {
        let store = MemoryWithdrawalStore::new();
        let now = Utc::now();

        let due = WithdrawalRequest::new(
            10.0,
            "+221770000001".to_string(),
            crate::state::PaymentOperator::Wave,
            now - chrono::Duration::minutes(1),
        );
        let future = WithdrawalRequest::new(
            20.0,
            "+221770000002".to_string(),
            crate::state::PaymentOperator::Wave,
            now + chrono::Duration::minutes(1),
        );
        let mut debited = WithdrawalRequest::new(
            30.0,
            "+221770000003".to_string(),
            crate::state::PaymentOperator::Wave,
            now - chrono::Duration::minutes(1),
        );
        debited.debited = true;
        debited.status = WithdrawalStatus::Processed;

        store.insert(&due).await.unwrap();
        store.insert(&future).await.unwrap();
        store.insert(&debited).await.unwrap();

        let listed = store.list_due(now).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, due.id);
    }
}
