//! Account-request lifecycle service.
//!
//! Owns creation and administrative status transitions of account
//! requests. Every mutation is a version-keyed conditional write, so two
//! concurrent administrative actions on the same request resolve to one
//! winner and one `StaleState` loser.

use chrono::Utc;
use tracing::info;

use crate::credential;
use crate::error::{CoreError, Result};
use crate::notify::{NotificationDispatcher, NotificationOutcome};
use crate::providers::{EmailProvider, RequestStore};
use crate::state::{AccountRequest, RequestId, RequestStatus};
use crate::utils::{is_valid_email, normalize_email};

/// Administrative actor context.
///
/// Passed explicitly into each administrative operation; there is no
/// process-wide "current admin" state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    /// Identifier of the administrator performing the action.
    pub actor: String,
}

impl AdminContext {
    /// Create a context for `actor`.
    #[must_use]
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
        }
    }
}

/// Account-request service.
#[derive(Debug, Clone)]
pub struct RequestService<S, E> {
    store: S,
    dispatcher: NotificationDispatcher<E>,
}

impl<S, E> RequestService<S, E>
where
    S: RequestStore + Clone,
    E: EmailProvider + Clone,
{
    /// Create a request service over a store and an email provider.
    pub const fn new(store: S, email: E) -> Self {
        Self {
            store,
            dispatcher: NotificationDispatcher::new(email),
        }
    }

    /// Submit a new account request for `email`.
    ///
    /// The "request received" notification is dispatched after the
    /// record has committed; its outcome is reported alongside.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidInput`] if the email is malformed
    /// - [`CoreError::Conflict`] if a non-terminal request already
    ///   exists for the email
    pub async fn create(&self, email: &str) -> Result<(AccountRequest, NotificationOutcome)> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(CoreError::InvalidInput {
                reason: "malformed email address".to_string(),
            });
        }

        let request = AccountRequest::new(email.clone(), Utc::now());
        let stored = self.store.insert(&request).await?;

        info!(request_id = %stored.id, email = %stored.email, "account request created");

        let outcome = self
            .dispatcher
            .dispatch(&stored.email, RequestStatus::Pending, None)
            .await;

        Ok((stored, outcome))
    }

    /// Get a request by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no record exists.
    pub async fn get(&self, id: RequestId) -> Result<AccountRequest> {
        self.store.get(id).await
    }

    /// List requests in `status`, ordered by request date ascending.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Store`] if the query fails.
    pub async fn list_by_status(&self, status: RequestStatus) -> Result<Vec<AccountRequest>> {
        self.store.list_by_status(status).await
    }

    /// Transition a request to `target` on behalf of `actor`.
    ///
    /// Approval atomically attaches a freshly minted temporary
    /// credential and sets the processed date; rejection sets the
    /// processed date; completion clears the credential. The write is
    /// conditioned on the version read here, so a concurrent transition
    /// on the same request loses with [`CoreError::StaleState`].
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the request does not exist
    /// - [`CoreError::InvalidTransition`] if the transition is not
    ///   defined from the current status
    /// - [`CoreError::StaleState`] if a concurrent mutation won
    pub async fn transition(
        &self,
        id: RequestId,
        target: RequestStatus,
        actor: &AdminContext,
    ) -> Result<(AccountRequest, NotificationOutcome)> {
        let current = self.store.get(id).await?;

        if !current.status.can_transition_to(target) {
            return Err(CoreError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        let mut updated = current;
        updated.status = target;
        match target {
            RequestStatus::Approved => {
                updated.temporary_credential = Some(credential::generate());
                updated.processed_date = Some(Utc::now());
            }
            RequestStatus::Rejected => {
                updated.processed_date = Some(Utc::now());
            }
            RequestStatus::Completed => {
                updated.temporary_credential = None;
            }
            RequestStatus::Pending => {}
        }

        let stored = self.store.update_if_version(&updated).await?;

        info!(
            request_id = %stored.id,
            email = %stored.email,
            status = %stored.status,
            actor = %actor.actor,
            "account request transitioned"
        );

        let outcome = self
            .dispatcher
            .dispatch(
                &stored.email,
                stored.status,
                stored.temporary_credential.as_deref(),
            )
            .await;

        Ok((stored, outcome))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockEmailProvider;
    use crate::stores::MemoryRequestStore;

    fn service() -> (RequestService<MemoryRequestStore, MockEmailProvider>, MockEmailProvider) {
        let email = MockEmailProvider::new();
        (
            RequestService::new(MemoryRequestStore::new(), email.clone()),
            email,
        )
    }

    #[tokio::test]
    async fn create_normalizes_and_notifies() {
        let (service, email) = service();

        let (request, outcome) = service.create("  Alice@Example.com ").await.unwrap();
        assert_eq!(request.email, "alice@example.com");
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(request.processed_date.is_none());
        assert!(outcome.is_delivered());
        assert_eq!(email.sent_to("alice@example.com").len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_malformed_email() {
        let (service, _) = service();
        assert!(matches!(
            service.create("not-an-email").await,
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn duplicate_active_request_conflicts() {
        let (service, _) = service();
        service.create("alice@example.com").await.unwrap();
        assert_eq!(
            service.create("alice@example.com").await.map(|_| ()),
            Err(CoreError::Conflict)
        );
    }

    #[tokio::test]
    async fn approval_mints_credential_and_sets_processed_date() {
        let (service, _) = service();
        let (request, _) = service.create("alice@example.com").await.unwrap();
        let actor = AdminContext::new("admin-1");

        let (approved, _) = service
            .transition(request.id, RequestStatus::Approved, &actor)
            .await
            .unwrap();

        assert_eq!(approved.status, RequestStatus::Approved);
        assert!(approved.processed_date.is_some());
        let secret = approved.temporary_credential.unwrap();
        assert!(secret.len() >= 12);
    }

    #[tokio::test]
    async fn rejection_is_terminal() {
        let (service, _) = service();
        let (request, _) = service.create("bob@example.com").await.unwrap();
        let actor = AdminContext::new("admin-1");

        service
            .transition(request.id, RequestStatus::Rejected, &actor)
            .await
            .unwrap();

        assert!(matches!(
            service
                .transition(request.id, RequestStatus::Approved, &actor)
                .await,
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_transition() {
        let (service, email) = service();
        let (request, _) = service.create("carol@example.com").await.unwrap();
        email.set_failing(true);

        let (approved, outcome) = service
            .transition(request.id, RequestStatus::Approved, &AdminContext::new("admin-1"))
            .await
            .unwrap();

        assert_eq!(approved.status, RequestStatus::Approved);
        assert!(!outcome.is_delivered());
    }
}
