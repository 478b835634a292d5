//! Image analysis routes
//!
//! Both routes accept an optional bearer token and otherwise act as the
//! configured demo user. A token that fails verification is rejected
//! before the body is read.

use crate::auth::RequestContext;
use crate::error::AnalysisError;
use crate::face::ImageInput;
use crate::services::analysis::{image_bytes, parse_image_source};
use crate::services::AnalysisService;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info};
use wellness_shared::types::AnalyzeRequest;
use wellness_shared::{HealthDataRecord, ImageHealthMetrics};

/// Room for a 5 MB image after base64 expansion plus JSON framing
const ANALYZE_BODY_LIMIT: usize = 8 * 1024 * 1024;

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/analyze",
            post(analyze).layer(DefaultBodyLimit::max(ANALYZE_BODY_LIMIT)),
        )
        .route("/health-data", get(history))
}

/// Image submitted as a multipart upload or a JSON body
#[derive(Debug)]
pub struct AnalyzeInput {
    pub image: ImageInput,
    pub save_image: bool,
}

#[axum::async_trait]
impl<S> FromRequest<S> for AnalyzeInput
where
    S: Send + Sync,
{
    type Rejection = AnalysisError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AnalysisError::InvalidImage(e.body_text()))?;
            return from_multipart(multipart).await;
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AnalysisError::InvalidImage(e.body_text()))?;
        if body.is_empty() {
            return Err(AnalysisError::NoImage);
        }

        let request: AnalyzeRequest = serde_json::from_slice(&body)
            .map_err(|e| AnalysisError::InvalidImage(format!("malformed JSON body: {}", e)))?;
        let image = request.image.as_deref().ok_or(AnalysisError::NoImage)?;

        Ok(AnalyzeInput {
            image: parse_image_source(image)?,
            save_image: request.save_image,
        })
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<AnalyzeInput, AnalysisError> {
    let mut image = None;
    let mut save_image = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalysisError::InvalidImage(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AnalysisError::InvalidImage(e.body_text()))?;
                image = Some(image_bytes(bytes.to_vec())?);
            }
            Some("saveImage") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AnalysisError::InvalidImage(e.body_text()))?;
                save_image = text.trim() == "true";
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    Ok(AnalyzeInput {
        image: image.ok_or(AnalysisError::NoImage)?,
        save_image,
    })
}

/// POST /api/analyze
async fn analyze(
    State(state): State<AppState>,
    ctx: RequestContext,
    input: AnalyzeInput,
) -> Result<Json<ImageHealthMetrics>, AnalysisError> {
    if !ctx.authenticated {
        info!(user_id = %ctx.user_id, "Analysing image as demo user");
    }
    let metrics = AnalysisService::analyze(
        state.db(),
        state.analyzer(),
        ctx.user_id,
        input.image,
        input.save_image,
    )
    .await?;
    Ok(Json(metrics))
}

/// GET /api/health-data
async fn history(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<HealthDataRecord>>, AnalysisError> {
    let records = AnalysisService::history(state.db(), ctx.user_id).await?;
    Ok(Json(records))
}
