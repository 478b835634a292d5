//! Insight routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::parse_id;
use crate::services::InsightService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use wellness_shared::types::{DataResponse, ListResponse};
use wellness_shared::HealthInsight;

pub fn insight_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_insights))
        .route("/unread", get(list_unread))
        .route("/:id/read", put(mark_read))
        .route("/:id/action", put(mark_action_taken))
}

async fn list_insights(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ListResponse<HealthInsight>>> {
    let insights = InsightService::list(state.db(), auth.user_id).await?;
    Ok(Json(ListResponse::new(insights)))
}

async fn list_unread(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ListResponse<HealthInsight>>> {
    let insights = InsightService::list_unread(state.db(), auth.user_id).await?;
    Ok(Json(ListResponse::new(insights)))
}

/// PUT /api/insights/:id/read
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<HealthInsight>>> {
    let insight_id = parse_id(&id)?;
    let insight = InsightService::mark_read(state.db(), auth.user_id, insight_id).await?;
    Ok(Json(DataResponse::new(insight)))
}

/// PUT /api/insights/:id/action
async fn mark_action_taken(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<HealthInsight>>> {
    let insight_id = parse_id(&id)?;
    let insight = InsightService::mark_action_taken(state.db(), auth.user_id, insight_id).await?;
    Ok(Json(DataResponse::new(insight)))
}
