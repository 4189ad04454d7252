//! Custom Axum extractors.
//!
//! - `CorrelationId`: extract or generate request correlation IDs
//! - `AdminActor`: explicit administrative actor from the `X-Admin-Id`
//!   header; administrative operations never rely on process-wide
//!   "current admin" state

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Correlation ID for request tracing.
///
/// Extracts the correlation ID from the `X-Correlation-ID` header,
/// or generates a new UUID v4 if not present.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .headers
            .get("X-Correlation-ID")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// Administrative actor identity.
///
/// Extracted from the `X-Admin-Id` header and passed explicitly into
/// each administrative core operation. Requests without the header are
/// rejected with 401.
#[derive(Debug, Clone)]
pub struct AdminActor(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AdminActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("X-Admin-Id")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
            .ok_or_else(|| AppError::unauthorized("Missing X-Admin-Id header"))
    }
}
