//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

/// Health check response.
///
/// Returns service status and database connectivity.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: &'static str,

    pub message: &'static str,

    /// Database connection status
    pub database: &'static str,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,

    /// Crate version
    pub version: &'static str,
}

/// Health check handler.
///
/// # Checks
///
/// - Database connectivity (executes simple query)
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "OK",
///   "message": "Mock payout gateway is running",
///   "database": "connected",
///   "timestamp": "2025-12-21T19:00:00Z",
///   "version": "0.1.0"
/// }
/// ```
///
/// # Response (500 Internal Server Error)
///
/// If database is unreachable, returns standard error response.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    // Verify database connectivity with simple query
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(HealthResponse {
        status: "OK",
        message: "Mock payout gateway is running",
        database: "connected",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    }))
}
