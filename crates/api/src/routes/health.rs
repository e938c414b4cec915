//! Status banner and health check.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub status: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// GET /
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        status: "GeoStone API running",
    })
}

/// GET /api/health
///
/// Pings the database and reports the round trip. Responds `503` with the
/// same body when the database is unreachable.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ping = persistence::db::ping(&state.pool).await;
    persistence::metrics::record_pool_metrics(&state.pool);

    let (status_code, response) = match ping {
        Ok(latency) => (
            StatusCode::OK,
            HealthResponse::new(
                "healthy",
                DatabaseHealth {
                    connected: true,
                    latency_ms: Some(latency.as_millis() as u64),
                },
            ),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthResponse::new(
                    "unhealthy",
                    DatabaseHealth {
                        connected: false,
                        latency_ms: None,
                    },
                ),
            )
        }
    };

    (status_code, Json(response))
}

impl HealthResponse {
    fn new(status: &'static str, database: DatabaseHealth) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
        }
    }
}
