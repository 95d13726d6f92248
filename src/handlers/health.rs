//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, services::ledger_service::LedgerService};

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub message: String,
}

/// Liveness handler.
///
/// Answers without touching storage, for load balancers that only need to
/// know the process is up.
///
/// # Response (200 OK)
///
/// ```json
/// { "message": "ok" }
/// ```
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: "ok".to_string(),
    })
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Storage backend status
    pub storage: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "storage": "connected",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// If storage is unreachable, returns the standard 500 error response.
pub async fn health_check(
    State(ledger): State<LedgerService>,
) -> Result<Json<HealthResponse>, AppError> {
    ledger.ping().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        storage: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
