pub mod dashboard;
pub mod transactions;

use crate::error::AppError;
use crate::schemas::LivenessResponse;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};

pub const SERVICE_NAME: &str = "YaYa Wallet Transaction Dashboard API";

/// Liveness check.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = LivenessResponse)
    ),
    tag = "Health"
)]
pub async fn root() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Dependency health. 503 unless every dependency is healthy.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Upstream reachable", body = crate::health::HealthResponse),
        (status = 503, description = "Upstream unreachable", body = crate::health::HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let health_response = state.health_checker.check_all().await;

    let status_code = if health_response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_response))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
