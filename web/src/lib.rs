//! # Backoffice Web
//!
//! Axum HTTP surface for the backoffice lifecycle core.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, headers
//! │  - Typed bodies validated at boundary   │  ← Tracing, CORS
//! │  - Taxonomy errors mapped to statuses   │
//! ├─────────────────────────────────────────┤
//! │         Lifecycle Core                  │
//! │  - Request / exchange / withdrawal      │  ← Conditional writes
//! │    services over provider traits        │  ← Best-effort dispatch
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extract** the typed body and headers (correlation id, admin actor)
//! 3. **Call** the core service operation
//! 4. **Map** the result or `CoreError` to an HTTP response

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

// Re-export main types for convenience
pub use error::AppError;
pub use extractors::{AdminActor, CorrelationId};
pub use router::app_router;
pub use state::AppState;
