//! Withdrawal handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use backoffice_core::providers::{
    AccountStore, EmailProvider, PaymentProvider, RequestStore, WithdrawalStore,
};
use backoffice_core::{PaymentOperator, WithdrawalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AppError;
use crate::extractors::{AdminActor, CorrelationId};
use crate::state::AppState;

/// Request to schedule a withdrawal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleWithdrawalBody {
    /// Positive amount to debit.
    pub amount: f64,

    /// Mobile-money destination number.
    pub destination_phone: String,

    /// Operator handling the debit.
    pub operator: PaymentOperator,

    /// Earliest processing time; defaults to now.
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Response after scheduling a withdrawal.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleWithdrawalResponse {
    /// Identifier of the scheduled withdrawal.
    pub withdrawal_id: WithdrawalId,
}

/// Response for a processing tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickResponse {
    /// Withdrawals debited and marked processed.
    pub processed: Vec<WithdrawalId>,

    /// Withdrawals whose debit failed.
    pub failed: Vec<WithdrawalId>,

    /// Due records another writer claimed first.
    pub skipped: usize,

    /// `true` if the tick was skipped because one was already running.
    pub in_flight: bool,
}

/// Schedule a withdrawal.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/withdrawals
/// Content-Type: application/json
///
/// {
///   "amount": 150.0,
///   "destination_phone": "+221770000000",
///   "operator": "wave",
///   "scheduled_at": "2026-08-23T12:00:00Z"
/// }
/// ```
///
/// # Response
///
/// - `201 Created` with the withdrawal id
/// - `422 Unprocessable Entity` for a non-positive amount or empty
///   destination
pub async fn schedule_withdrawal<RS, AS, WS, E, P>(
    State(state): State<Arc<AppState<RS, AS, WS, E, P>>>,
    correlation_id: CorrelationId,
    Json(body): Json<ScheduleWithdrawalBody>,
) -> Result<(StatusCode, Json<ScheduleWithdrawalResponse>), AppError>
where
    RS: RequestStore + Clone + 'static,
    AS: AccountStore + Clone + 'static,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone + 'static,
    P: PaymentProvider + Clone + 'static,
{
    tracing::info!(
        correlation_id = %correlation_id.0,
        operator = %body.operator,
        "withdrawal scheduling requested"
    );

    let withdrawal = state
        .withdrawals
        .service()
        .schedule(
            body.amount,
            &body.destination_phone,
            body.operator,
            body.scheduled_at,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ScheduleWithdrawalResponse {
            withdrawal_id: withdrawal.id,
        }),
    ))
}

/// Run a withdrawal processing tick now.
///
/// The server also ticks on its own timer; this endpoint exists for
/// operational use. It shares the single-flight guard with the
/// background loop, so it can never overlap a running pass.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/withdrawals/tick
/// X-Admin-Id: admin-1
/// ```
///
/// # Response
///
/// - `200 OK` with the processed/failed ids (`in_flight: true` and
///   empty lists when a pass was already running)
/// - `500 Internal Server Error` if the due-record query fails
pub async fn tick<RS, AS, WS, E, P>(
    State(state): State<Arc<AppState<RS, AS, WS, E, P>>>,
    _admin: AdminActor,
) -> Result<Json<TickResponse>, AppError>
where
    RS: RequestStore + Clone + 'static,
    AS: AccountStore + Clone + 'static,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone + 'static,
    P: PaymentProvider + Clone + 'static,
{
    let response = match state.withdrawals.tick_now().await? {
        Some(report) => TickResponse {
            processed: report.processed,
            failed: report.failed,
            skipped: report.skipped,
            in_flight: false,
        },
        None => TickResponse {
            processed: Vec::new(),
            failed: Vec::new(),
            skipped: 0,
            in_flight: true,
        },
    };

    Ok(Json(response))
}
