//! Service health and metrics endpoints

use crate::{db, state::AppState};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use wellness_shared::types::{ReadinessStatus, ServiceStatus};

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime: state.uptime_secs(),
    })
}

/// GET /api/health/ready, 503 while the database is unreachable
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessStatus>, (StatusCode, Json<ReadinessStatus>)> {
    let database_ok = db::health_check(state.db()).await.is_ok();

    let response = ReadinessStatus {
        status: if database_ok { "ready" } else { "not_ready" }.to_string(),
        database: if database_ok { "healthy" } else { "unhealthy" }.to_string(),
        face_analysis: state.analyzer().provider().to_string(),
    };

    if database_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// GET /metrics in Prometheus text format
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
