//! Account-request handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use backoffice_core::providers::{
    AccountStore, EmailProvider, PaymentProvider, RequestStore, WithdrawalStore,
};
use backoffice_core::{AccountRequest, AdminContext, RequestId, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AppError;
use crate::extractors::{AdminActor, CorrelationId};
use crate::state::AppState;

/// Request to submit an account request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitRequestBody {
    /// Email address requesting an account.
    pub email: String,
}

/// Response after submitting an account request.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequestResponse {
    /// Identifier of the created request.
    pub request_id: RequestId,

    /// Whether the "request received" notification was delivered.
    pub notified: bool,
}

/// Administrative action on a pending request.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionAction {
    /// Approve the request, minting a temporary credential.
    Approve,
    /// Reject the request.
    Reject,
}

impl TransitionAction {
    const fn target(self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}

/// Request for an administrative transition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransitionBody {
    /// Request to act on.
    pub request_id: RequestId,

    /// Action to take.
    pub action: TransitionAction,
}

/// Response after an administrative transition.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionResponse {
    /// Status the request is now in.
    pub status: RequestStatus,

    /// Whether the transition notification was delivered.
    pub notified: bool,
}

/// Query parameters for the admin review listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRequestsParams {
    /// Status to filter on.
    pub status: RequestStatus,
}

/// One request in the admin review listing.
///
/// Deliberately excludes the temporary credential; it leaves the system
/// only inside the approval email.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    /// Request identifier.
    pub id: RequestId,
    /// Requesting email.
    pub email: String,
    /// Current status.
    pub status: RequestStatus,
    /// Submission timestamp.
    pub request_date: DateTime<Utc>,
    /// Decision timestamp, if decided.
    pub processed_date: Option<DateTime<Utc>>,
}

impl From<AccountRequest> for RequestSummary {
    fn from(request: AccountRequest) -> Self {
        Self {
            id: request.id,
            email: request.email,
            status: request.status,
            request_date: request.request_date,
            processed_date: request.processed_date,
        }
    }
}

/// Submit a new account request.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/requests
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com"
/// }
/// ```
///
/// # Response
///
/// - `201 Created` with the request id
/// - `409 Conflict` if a non-terminal request exists for the email
/// - `422 Unprocessable Entity` if the email is malformed
pub async fn submit_request<RS, AS, WS, E, P>(
    State(state): State<Arc<AppState<RS, AS, WS, E, P>>>,
    correlation_id: CorrelationId,
    Json(body): Json<SubmitRequestBody>,
) -> Result<(StatusCode, Json<SubmitRequestResponse>), AppError>
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
        "account request submitted"
    );

    let (request, outcome) = state.requests.create(&body.email).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitRequestResponse {
            request_id: request.id,
            notified: outcome.is_delivered(),
        }),
    ))
}

/// Approve or reject a pending request.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/requests/transition
/// X-Admin-Id: admin-1
/// Content-Type: application/json
///
/// {
///   "request_id": "550e8400-e29b-41d4-a716-446655440000",
///   "action": "approve"
/// }
/// ```
///
/// # Response
///
/// - `200 OK` with the new status
/// - `401 Unauthorized` without an `X-Admin-Id` header
/// - `404 Not Found` for an unknown request id
/// - `409 Conflict` on an illegal transition or a lost race
pub async fn transition_request<RS, AS, WS, E, P>(
    State(state): State<Arc<AppState<RS, AS, WS, E, P>>>,
    correlation_id: CorrelationId,
    admin: AdminActor,
    Json(body): Json<TransitionBody>,
) -> Result<Json<TransitionResponse>, AppError>
where
    RS: RequestStore + Clone + 'static,
    AS: AccountStore + Clone + 'static,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone + 'static,
    P: PaymentProvider + Clone + 'static,
{
    tracing::info!(
        correlation_id = %correlation_id.0,
        request_id = %body.request_id,
        actor = %admin.0,
        action = ?body.action,
        "administrative transition requested"
    );

    let actor = AdminContext::new(admin.0);
    let (request, outcome) = state
        .requests
        .transition(body.request_id, body.action.target(), &actor)
        .await?;

    Ok(Json(TransitionResponse {
        status: request.status,
        notified: outcome.is_delivered(),
    }))
}

/// List requests by status for administrative review.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/requests?status=pending
/// X-Admin-Id: admin-1
/// ```
pub async fn list_requests<RS, AS, WS, E, P>(
    State(state): State<Arc<AppState<RS, AS, WS, E, P>>>,
    _admin: AdminActor,
    Query(params): Query<ListRequestsParams>,
) -> Result<Json<Vec<RequestSummary>>, AppError>
where
    RS: RequestStore + Clone + 'static,
    AS: AccountStore + Clone + 'static,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone + 'static,
    P: PaymentProvider + Clone + 'static,
{
    let requests = state.requests.list_by_status(params.status).await?;
    Ok(Json(requests.into_iter().map(RequestSummary::from).collect()))
}
