//! First-login exchange handler.

use axum::extract::State;
use axum::Json;
use backoffice_core::providers::{
    AccountStore, EmailProvider, PaymentProvider, RequestStore, WithdrawalStore,
};
use backoffice_core::AccountId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AppError;
use crate::extractors::CorrelationId;
use crate::state::AppState;

/// Request to complete first login.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirstLoginBody {
    /// Email the request was approved for.
    pub email: String,

    /// Temporary credential from the approval email.
    pub temporary_credential: String,

    /// New permanent credential chosen by the requester.
    pub new_credential: String,
}

/// Response after a successful first login.
#[derive(Debug, Clone, Serialize)]
pub struct FirstLoginResponse {
    /// Identifier of the activated account.
    pub account_id: AccountId,
}

/// Exchange a temporary credential for a permanent one.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/first-login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "temporary_credential": "aB3!xYz9kLmN2pQ&",
///   "new_credential": "NewPass123"
/// }
/// ```
///
/// # Response
///
/// - `200 OK` with the activated account id
/// - `400 Bad Request` if the new credential is too weak
/// - `401 Unauthorized` on a temporary-credential mismatch
/// - `404 Not Found` if no request is approved for the email
///   (including after a previous successful exchange)
pub async fn first_login<RS, AS, WS, E, P>(
    State(state): State<Arc<AppState<RS, AS, WS, E, P>>>,
    correlation_id: CorrelationId,
    Json(body): Json<FirstLoginBody>,
) -> Result<Json<FirstLoginResponse>, AppError>
where
    RS: RequestStore + Clone + 'static,
    AS: AccountStore + Clone + 'static,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone + 'static,
    P: PaymentProvider + Clone + 'static,
{
    tracing::info!(
        correlation_id = %correlation_id.0,
        email = %body.email,
        "first-login exchange requested"
    );

    let account = state
        .exchange
        .exchange(&body.email, &body.temporary_credential, &body.new_credential)
        .await?;

    Ok(Json(FirstLoginResponse {
        account_id: account.id,
    }))
}
