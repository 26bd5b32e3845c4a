/// Health check endpoint
///
/// Public: it runs before identity resolution and never creates a user.
///
/// # Endpoint
///
/// ```text
/// GET /api/health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "active_connections": 1, "idle_connections": 3, "total_connections": 4 }
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use kanban_shared::db::pool::{get_pool_stats, health_check as db_health_check, PoolStats};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,

    pub pool: PoolStats,
}

impl HealthResponse {
    fn new(database_ok: bool, pool: PoolStats) -> Self {
        let (status, database) = if database_ok {
            ("healthy", "connected")
        } else {
            ("degraded", "disconnected")
        };

        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
            pool,
        }
    }
}

/// Reports service health; always 200 so a degraded database stays visible
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_ok = match db_health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse::new(database_ok, get_pool_stats(&state.db)))
}
