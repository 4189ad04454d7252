//! Router composition.
//!
//! Composes all lifecycle handlers into a single Axum router.

use axum::{
    routing::{get, post},
    Router,
};
use backoffice_core::providers::{
    AccountStore, EmailProvider, PaymentProvider, RequestStore, WithdrawalStore,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{exchange, health, requests, withdrawals};
use crate::state::AppState;

/// Create the application router with all lifecycle endpoints.
///
/// # Routes
///
/// ## Account requests
/// - `POST /api/v1/requests` - Submit an account request
/// - `GET  /api/v1/requests` - List requests by status (admin)
/// - `POST /api/v1/requests/transition` - Approve or reject (admin)
///
/// ## First login
/// - `POST /api/v1/first-login` - Exchange the temporary credential
///
/// ## Withdrawals
/// - `POST /api/v1/withdrawals` - Schedule a withdrawal
/// - `POST /api/v1/withdrawals/tick` - Run a processing tick (admin)
///
/// ## Operational
/// - `GET /health` - Liveness probe
pub fn app_router<RS, AS, WS, E, P>(state: Arc<AppState<RS, AS, WS, E, P>>) -> Router
where
    RS: RequestStore + Clone + 'static,
    AS: AccountStore + Clone + 'static,
    WS: WithdrawalStore + Clone + 'static,
    E: EmailProvider + Clone + 'static,
    P: PaymentProvider + Clone + 'static,
{
    Router::new()
        // Account requests
        .route(
            "/api/v1/requests",
            post(requests::submit_request::<RS, AS, WS, E, P>)
                .get(requests::list_requests::<RS, AS, WS, E, P>),
        )
        .route(
            "/api/v1/requests/transition",
            post(requests::transition_request::<RS, AS, WS, E, P>),
        )
        // First login
        .route(
            "/api/v1/first-login",
            post(exchange::first_login::<RS, AS, WS, E, P>),
        )
        // Withdrawals
        .route(
            "/api/v1/withdrawals",
            post(withdrawals::schedule_withdrawal::<RS, AS, WS, E, P>),
        )
        .route(
            "/api/v1/withdrawals/tick",
            post(withdrawals::tick::<RS, AS, WS, E, P>),
        )
        // Operational
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
