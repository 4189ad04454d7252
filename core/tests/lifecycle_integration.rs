//! Integration tests for the account-request lifecycle.

#![allow(clippy::unwrap_used)]

use backoffice_core::mocks::MockEmailProvider;
use backoffice_core::providers::{AccountStore, RequestStore};
use backoffice_core::stores::{MemoryAccountStore, MemoryRequestStore};
use backoffice_core::{
    AdminContext, CoreError, CredentialPolicy, ExchangeService, RequestService, RequestStatus,
};

struct Fixture {
    store: MemoryRequestStore,
    email: MockEmailProvider,
    requests: RequestService<MemoryRequestStore, MockEmailProvider>,
    exchange: ExchangeService<MemoryRequestStore, MemoryAccountStore, MockEmailProvider>,
    accounts: MemoryAccountStore,
}

fn fixture() -> Fixture {
    let store = MemoryRequestStore::new();
    let accounts = MemoryAccountStore::new();
    let email = MockEmailProvider::new();
    Fixture {
        requests: RequestService::new(store.clone(), email.clone()),
        exchange: ExchangeService::new(
            store.clone(),
            accounts.clone(),
            email.clone(),
            CredentialPolicy::default(),
        ),
        store,
        email,
        accounts,
    }
}

#[tokio::test]
async fn full_lifecycle_from_submission_to_active_account() {
    let f = fixture();
    let admin = AdminContext::new("admin-1");

    // Submission
    let (request, _) = f.requests.create("alice@example.com").await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert!(request.temporary_credential.is_none());

    // Approval
    let (approved, _) = f
        .requests
        .transition(request.id, RequestStatus::Approved, &admin)
        .await
        .unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert!(approved.processed_date.is_some());
    let secret = approved.temporary_credential.clone().unwrap();
    assert!(!secret.is_empty());

    // The approval email carries the temporary credential.
    let approval_mail = f.email.sent_to("alice@example.com");
    assert!(approval_mail.iter().any(|m| m.body.contains(&secret)));

    // First login
    let account = f
        .exchange
        .exchange("alice@example.com", &secret, "NewPass123")
        .await
        .unwrap();
    assert!(account.active);

    // Request is terminal with its credential cleared.
    let completed = f.requests.get(request.id).await.unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert!(completed.temporary_credential.is_none());
}

#[tokio::test]
async fn at_most_one_active_request_per_email() {
    let f = fixture();
    let admin = AdminContext::new("admin-1");

    let (request, _) = f.requests.create("alice@example.com").await.unwrap();
    assert_eq!(
        f.requests.create("alice@example.com").await.map(|_| ()),
        Err(CoreError::Conflict)
    );

    // Still active once approved.
    let (approved, _) = f
        .requests
        .transition(request.id, RequestStatus::Approved, &admin)
        .await
        .unwrap();
    assert_eq!(
        f.requests.create("alice@example.com").await.map(|_| ()),
        Err(CoreError::Conflict)
    );

    // Terminal after completion; a new request is allowed.
    let secret = approved.temporary_credential.unwrap();
    f.exchange
        .exchange("alice@example.com", &secret, "NewPass123")
        .await
        .unwrap();
    assert!(f.requests.create("alice@example.com").await.is_ok());
}

#[tokio::test]
async fn concurrent_transitions_have_exactly_one_winner() {
    let f = fixture();
    let (request, _) = f.requests.create("bob@example.com").await.unwrap();

    // Two administrators act on the same snapshot: the conditional
    // write admits exactly one.
    let snapshot = f.store.get(request.id).await.unwrap();

    let mut approve = snapshot.clone();
    approve.status = RequestStatus::Approved;
    approve.temporary_credential = Some("aB3!xYz9kLmN2pQ&".to_string());
    approve.processed_date = Some(chrono::Utc::now());

    let mut reject = snapshot;
    reject.status = RequestStatus::Rejected;
    reject.processed_date = Some(chrono::Utc::now());

    let first = f.store.update_if_version(&approve).await;
    let second = f.store.update_if_version(&reject).await;

    assert!(first.is_ok());
    assert_eq!(second, Err(CoreError::StaleState));
}

#[tokio::test]
async fn racing_admin_actions_resolve_to_one_success() {
    let f = fixture();
    let (request, _) = f.requests.create("carol@example.com").await.unwrap();

    let s1 = f.requests.clone();
    let s2 = f.requests.clone();
    let id = request.id;
    let a = tokio::spawn(async move {
        s1.transition(id, RequestStatus::Approved, &AdminContext::new("admin-1"))
            .await
    });
    let b = tokio::spawn(async move {
        s2.transition(id, RequestStatus::Approved, &AdminContext::new("admin-2"))
            .await
    });

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one admin action may win");
    // The loser observed either the version race or the already-applied
    // transition, depending on interleaving.
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(
        loser,
        Err(CoreError::StaleState | CoreError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn exchange_with_wrong_credential_changes_nothing() {
    let f = fixture();
    let admin = AdminContext::new("admin-1");
    let (request, _) = f.requests.create("dave@example.com").await.unwrap();
    f.requests
        .transition(request.id, RequestStatus::Approved, &admin)
        .await
        .unwrap();

    let result = f
        .exchange
        .exchange("dave@example.com", "WrongSecret999!", "NewPass123")
        .await;
    assert_eq!(result, Err(CoreError::InvalidCredential));

    let stored = f.requests.get(request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);
    assert!(stored.temporary_credential.is_some());
    assert!(f
        .accounts
        .find_by_email("dave@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn temporary_credential_is_single_use() {
    let f = fixture();
    let admin = AdminContext::new("admin-1");
    let (request, _) = f.requests.create("erin@example.com").await.unwrap();
    let (approved, _) = f
        .requests
        .transition(request.id, RequestStatus::Approved, &admin)
        .await
        .unwrap();
    let secret = approved.temporary_credential.unwrap();

    f.exchange
        .exchange("erin@example.com", &secret, "NewPass123")
        .await
        .unwrap();

    // The approved record no longer exists in that state.
    assert_eq!(
        f.exchange
            .exchange("erin@example.com", &secret, "OtherPass456")
            .await,
        Err(CoreError::NotFound)
    );
}

#[tokio::test]
async fn credentials_are_independent_of_request_metadata() {
    // Approve many requests with near-identical metadata; the minted
    // secrets must neither repeat nor embed the email.
    let admin = AdminContext::new("admin-1");
    let mut secrets = std::collections::HashSet::new();

    for i in 0..16 {
        let f = fixture();
        let email = format!("frank{i}@example.com");
        let (request, _) = f.requests.create(&email).await.unwrap();
        let (approved, _) = f
            .requests
            .transition(request.id, RequestStatus::Approved, &admin)
            .await
            .unwrap();
        let secret = approved.temporary_credential.unwrap();
        assert!(!secret.contains("frank"));
        assert!(secrets.insert(secret));
    }
}
