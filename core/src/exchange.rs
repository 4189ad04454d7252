//! First-login exchange.
//!
//! Trades an approved request's one-time temporary credential for a
//! permanent one, activating the account. The exchange claims the
//! request with a conditional write before touching the account, which
//! makes the temporary credential single-use by construction: whoever
//! loses the claim observes no `Approved` record and gets `NotFound`.

use tracing::{error, info};

use crate::config::CredentialPolicy;
use crate::credential;
use crate::error::{CoreError, Result};
use crate::notify::NotificationDispatcher;
use crate::providers::{AccountStore, EmailProvider, RequestStore};
use crate::state::{Account, RequestStatus};
use crate::utils::normalize_email;

/// First-login exchange service.
#[derive(Debug, Clone)]
pub struct ExchangeService<S, A, E> {
    requests: S,
    accounts: A,
    dispatcher: NotificationDispatcher<E>,
    policy: CredentialPolicy,
}

impl<S, A, E> ExchangeService<S, A, E>
where
    S: RequestStore + Clone,
    A: AccountStore + Clone,
    E: EmailProvider + Clone,
{
    /// Create an exchange service.
    pub const fn new(requests: S, accounts: A, email: E, policy: CredentialPolicy) -> Self {
        Self {
            requests,
            accounts,
            dispatcher: NotificationDispatcher::new(email),
            policy,
        }
    }

    /// Exchange a temporary credential for a permanent one.
    ///
    /// Steps, all-or-nothing as observed by other readers:
    ///
    /// 1. Look up the `Approved` request for `email`.
    /// 2. Compare the supplied temporary credential in constant time.
    /// 3. Validate the new credential against the strength policy.
    /// 4. Claim the request (`Approved -> Completed`, credential
    ///    cleared) with a conditional write, then store the hashed
    ///    credential and activate the account. If the account write
    ///    fails, the claim is compensated so the request is observable
    ///    as `Approved` again with its original credential.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if no request is in `Approved` for the
    ///   email, including after a previous successful exchange
    /// - [`CoreError::InvalidCredential`] on temporary-credential
    ///   mismatch (no hint which half failed)
    /// - [`CoreError::WeakCredential`] if the new credential violates
    ///   the policy
    pub async fn exchange(
        &self,
        email: &str,
        temporary_credential: &str,
        new_credential: &str,
    ) -> Result<Account> {
        let email = normalize_email(email);

        let request = self
            .requests
            .find_by_email_and_status(&email, RequestStatus::Approved)
            .await?
            .ok_or(CoreError::NotFound)?;

        // An approved record without a stored credential matches nothing,
        // not the empty string.
        let Some(stored_secret) = request.temporary_credential.as_deref() else {
            return Err(CoreError::InvalidCredential);
        };
        if !credential::verify_temporary(temporary_credential, stored_secret) {
            return Err(CoreError::InvalidCredential);
        }

        self.policy.validate(new_credential)?;
        let credential_hash = credential::hash_credential(new_credential)?;

        // Claim the request first. A concurrent exchange for the same
        // email races on this write; the loser sees NotFound, which is
        // also what any later caller sees once the credential is spent.
        let mut claimed = request.clone();
        claimed.status = RequestStatus::Completed;
        claimed.temporary_credential = None;
        let claimed = match self.requests.update_if_version(&claimed).await {
            Ok(stored) => stored,
            Err(CoreError::StaleState | CoreError::NotFound) => return Err(CoreError::NotFound),
            Err(e) => return Err(e),
        };

        let mut account = self
            .accounts
            .find_by_email(&email)
            .await?
            .unwrap_or_else(|| Account::new(email.clone()));
        account.credential_hash = Some(credential_hash);
        account.active = true;

        let account = match self.accounts.upsert(&account).await {
            Ok(stored) => stored,
            Err(e) => {
                self.compensate_claim(&claimed, &request).await;
                return Err(e);
            }
        };

        info!(
            request_id = %claimed.id,
            account_id = %account.id,
            email = %email,
            "first-login exchange completed"
        );

        // Best-effort; the exchange has already committed.
        let _ = self
            .dispatcher
            .dispatch(&email, RequestStatus::Completed, None)
            .await;

        Ok(account)
    }

    /// Roll the claimed request back to `Approved` with its original
    /// credential after an account-write failure.
    async fn compensate_claim(
        &self,
        claimed: &crate::state::AccountRequest,
        original: &crate::state::AccountRequest,
    ) {
        let mut revert = claimed.clone();
        revert.status = RequestStatus::Approved;
        revert.temporary_credential = original.temporary_credential.clone();
        if let Err(e) = self.requests.update_if_version(&revert).await {
            error!(
                request_id = %claimed.id,
                error = %e,
                "failed to compensate claimed request after account write failure"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockEmailProvider;
    use crate::requests::{AdminContext, RequestService};
    use crate::stores::{MemoryAccountStore, MemoryRequestStore};

    async fn approved_request() -> (
        ExchangeService<MemoryRequestStore, MemoryAccountStore, MockEmailProvider>,
        RequestService<MemoryRequestStore, MockEmailProvider>,
        MemoryAccountStore,
        String,
    ) {
        let store = MemoryRequestStore::new();
        let accounts = MemoryAccountStore::new();
        let email = MockEmailProvider::new();

        let requests = RequestService::new(store.clone(), email.clone());
        let (request, _) = requests.create("alice@example.com").await.unwrap();
        let (approved, _) = requests
            .transition(request.id, RequestStatus::Approved, &AdminContext::new("admin-1"))
            .await
            .unwrap();

        let exchange = ExchangeService::new(
            store,
            accounts.clone(),
            email,
            CredentialPolicy::default(),
        );
        let secret = approved.temporary_credential.unwrap();
        (exchange, requests, accounts, secret)
    }

    #[tokio::test]
    async fn successful_exchange_activates_account() {
        let (exchange, requests, _, secret) = approved_request().await;

        let account = exchange
            .exchange("alice@example.com", &secret, "NewPass123")
            .await
            .unwrap();

        assert!(account.active);
        assert!(account.credential_hash.is_some());
        assert!(credential::verify_credential(
            "NewPass123",
            account.credential_hash.as_deref().unwrap()
        )
        .unwrap());

        let completed = requests
            .list_by_status(RequestStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].temporary_credential.is_none());
    }

    #[tokio::test]
    async fn wrong_temporary_credential_leaves_request_untouched() {
        let (exchange, requests, accounts, _) = approved_request().await;

        let result = exchange
            .exchange("alice@example.com", "WrongSecret999!", "NewPass123")
            .await;
        assert_eq!(result, Err(CoreError::InvalidCredential));

        let approved = requests
            .list_by_status(RequestStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert!(approved[0].temporary_credential.is_some());
        assert!(accounts.find_by_email("alice@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn weak_new_credential_is_rejected() {
        let (exchange, _, _, secret) = approved_request().await;

        assert!(matches!(
            exchange.exchange("alice@example.com", &secret, "short").await,
            Err(CoreError::WeakCredential { .. })
        ));
    }

    #[tokio::test]
    async fn exchange_is_single_use() {
        let (exchange, _, _, secret) = approved_request().await;

        exchange
            .exchange("alice@example.com", &secret, "NewPass123")
            .await
            .unwrap();

        assert_eq!(
            exchange
                .exchange("alice@example.com", &secret, "NewPass123")
                .await,
            Err(CoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn approved_request_without_credential_rejects_empty_secret() {
        use crate::providers::RequestStore;
        use crate::state::AccountRequest;

        let store = MemoryRequestStore::new();
        let mut orphaned = AccountRequest::new("alice@example.com".to_string(), chrono::Utc::now());
        orphaned.status = RequestStatus::Approved;
        store.insert(&orphaned).await.unwrap();

        let exchange = ExchangeService::new(
            store,
            MemoryAccountStore::new(),
            MockEmailProvider::new(),
            CredentialPolicy::default(),
        );

        assert_eq!(
            exchange.exchange("alice@example.com", "", "NewPass123").await,
            Err(CoreError::InvalidCredential)
        );
    }

    #[tokio::test]
    async fn exchange_without_approved_request_is_not_found() {
        let exchange = ExchangeService::new(
            MemoryRequestStore::new(),
            MemoryAccountStore::new(),
            MockEmailProvider::new(),
            CredentialPolicy::default(),
        );

        assert_eq!(
            exchange
                .exchange("nobody@example.com", "whatever12345!", "NewPass123")
                .await,
            Err(CoreError::NotFound)
        );
    }
}
