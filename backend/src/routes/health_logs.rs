//! Daily health log routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::parse_id;
use crate::services::HealthLogService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use wellness_shared::types::{DataResponse, HealthSummary, ListResponse};
use wellness_shared::{HealthLog, HealthLogEntry};

pub fn health_log_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_logs).post(create_log))
        // Registered before the id route
        .route("/summary", get(get_summary))
        .route("/:id", get(get_log))
}

/// POST /api/health-logs
///
/// Scores the entry, refreshes the user's rolling score and runs the
/// insight rules before responding.
async fn create_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(entry): Json<HealthLogEntry>,
) -> ApiResult<(StatusCode, Json<DataResponse<HealthLog>>)> {
    let log = HealthLogService::create(state.db(), auth.user_id, entry).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(log))))
}

async fn list_logs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ListResponse<HealthLog>>> {
    let logs = HealthLogService::list(state.db(), auth.user_id).await?;
    Ok(Json(ListResponse::new(logs)))
}

async fn get_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DataResponse<HealthSummary>>> {
    let summary = HealthLogService::get_summary(state.db(), auth.user_id).await?;
    Ok(Json(DataResponse::new(summary)))
}

async fn get_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<HealthLog>>> {
    let log_id = parse_id(&id)?;
    let log = HealthLogService::get(state.db(), auth.user_id, log_id).await?;
    Ok(Json(DataResponse::new(log)))
}
