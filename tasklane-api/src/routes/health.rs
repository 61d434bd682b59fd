/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": {"active_connections": 1, "idle_connections": 2, "total_connections": 3}
/// }
/// ```
///
/// Answers 200 while the database is reachable and 503 with
/// `"status": "degraded"` when it is not.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tasklane_shared::db::pool::{get_pool_stats, health_check as ping_database, PoolStats};
use tracing::warn;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub pool: PoolStats,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, database) = match ping_database(&state.db).await {
        Ok(()) => (StatusCode::OK, "healthy", "connected"),
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
        }
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        pool: get_pool_stats(&state.db),
    };

    (code, Json(body))
}
