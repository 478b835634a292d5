//! Insight service
//!
//! Runs the insight rules after each log submission and serves the
//! read/action state changes.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, error, info};
use uuid::Uuid;
use wellness_shared::insights::generate_insights;
use wellness_shared::trends::window_start;
use wellness_shared::HealthInsight;

use crate::error::ApiError;
use crate::repositories::health_log::into_logs;
use crate::repositories::insight::into_insights;
use crate::repositories::{HealthLogRepository, InsightRecord, InsightRepository};

pub struct InsightService;

impl InsightService {
    /// Evaluate the rules over the trailing window and store what fires
    ///
    /// Never fails; errors are logged and dropped.
    pub async fn generate_for_user(pool: &PgPool, user_id: Uuid) {
        match Self::try_generate(pool, user_id).await {
            Ok(0) => debug!(user_id = %user_id, "No insights generated"),
            Ok(count) => {
                metrics::counter!("insights_generated_total").increment(count as u64);
                info!(user_id = %user_id, count, "Insights generated");
            }
            Err(e) => error!(user_id = %user_id, error = ?e, "Error generating insights"),
        }
    }

    async fn try_generate(pool: &PgPool, user_id: Uuid) -> anyhow::Result<usize> {
        let records = HealthLogRepository::list_since(pool, user_id, window_start(Utc::now())).await?;
        let logs = into_logs(records)?;

        let drafts = generate_insights(&logs);
        if drafts.is_empty() {
            return Ok(0);
        }

        let saved = InsightRepository::insert_many(pool, user_id, &drafts).await?;
        Ok(saved.len())
    }

    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<HealthInsight>, ApiError> {
        let records = InsightRepository::list_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        into_insights(records).map_err(ApiError::Internal)
    }

    pub async fn list_unread(pool: &PgPool, user_id: Uuid) -> Result<Vec<HealthInsight>, ApiError> {
        let records = InsightRepository::list_unread(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        into_insights(records).map_err(ApiError::Internal)
    }

    /// Mark read; repeating it is harmless
    pub async fn mark_read(
        pool: &PgPool,
        user_id: Uuid,
        insight_id: Uuid,
    ) -> Result<HealthInsight, ApiError> {
        Self::owned(pool, user_id, insight_id).await?;
        let record = InsightRepository::mark_read(pool, insight_id)
            .await
            .map_err(ApiError::Internal)?;
        HealthInsight::try_from(record).map_err(ApiError::Internal)
    }

    /// Mark the suggested action as taken, which also marks it read
    pub async fn mark_action_taken(
        pool: &PgPool,
        user_id: Uuid,
        insight_id: Uuid,
    ) -> Result<HealthInsight, ApiError> {
        Self::owned(pool, user_id, insight_id).await?;
        let record = InsightRepository::mark_action_taken(pool, insight_id)
            .await
            .map_err(ApiError::Internal)?;
        HealthInsight::try_from(record).map_err(ApiError::Internal)
    }

    async fn owned(pool: &PgPool, user_id: Uuid, insight_id: Uuid) -> Result<InsightRecord, ApiError> {
        let record = InsightRepository::find_by_id(pool, insight_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Insight not found".to_string()))?;

        if record.user_id != user_id {
            return Err(ApiError::Unauthorized("Not authorized".to_string()));
        }

        Ok(record)
    }
}
