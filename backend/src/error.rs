//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use wellness_shared::ValidationError;

use crate::config::AppConfig;
use crate::face::FaceAnalysisError;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Underlying cause, only outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, detail) = match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadRequest(msg) => (msg, None),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                ("Server error".to_string(), Some(err.to_string()))
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                ("Server error".to_string(), Some(err.to_string()))
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: detail.filter(|_| !AppConfig::is_production()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from the image analysis routes, rendered as `{error}`
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No image provided")]
    NoImage,

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Failed to analyze health data")]
    Analysis(#[from] FaceAnalysisError),

    #[error("Failed to analyze health data")]
    Storage(#[source] anyhow::Error),

    #[error("Failed to retrieve health history")]
    History(#[source] anyhow::Error),
}

#[derive(Serialize, Debug)]
pub struct AnalysisErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, detail) = match self {
            AnalysisError::NoImage | AnalysisError::InvalidImage(_) => {
                (StatusCode::BAD_REQUEST, None)
            }
            AnalysisError::Analysis(e) => {
                error!("Health analysis error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string()))
            }
            AnalysisError::Storage(e) | AnalysisError::History(e) => {
                error!("Health data storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string()))
            }
        };

        let body = Json(AnalysisErrorBody {
            error: message,
            detail: detail.filter(|_| !AppConfig::is_production()),
        });

        (status, body).into_response()
    }
}
