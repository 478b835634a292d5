//! Authentication routes
//!
//! Password hashing and verification run on the blocking thread pool
//! inside [`UserService`].

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use wellness_shared::types::{AuthResponse, LoginRequest, RegisterRequest};
use wellness_shared::User;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user", get(get_user))
}

/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = UserService::register(state.db(), state.jwt(), req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = UserService::login(state.db(), state.jwt(), req).await?;
    Ok(Json(response))
}

/// GET /api/auth/user
async fn get_user(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<User>> {
    let user = UserService::get_user(state.db(), auth.user_id).await?;
    Ok(Json(user))
}
