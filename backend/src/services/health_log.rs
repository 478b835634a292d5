//! Health log service
//!
//! Scores and stores daily logs, keeps the user's rolling health score
//! current, and builds the dashboard summary.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use wellness_shared::trends::{build_trends, window_start};
use wellness_shared::types::HealthSummary;
use wellness_shared::validation::validate_health_log_entry;
use wellness_shared::{calculate_health_score, HealthLog, HealthLogEntry};

use crate::error::ApiError;
use crate::repositories::health_log::into_logs;
use crate::repositories::HealthLogRepository;
use crate::services::InsightService;

pub struct HealthLogService;

impl HealthLogService {
    /// Validate, score and store a log, then run insight generation
    ///
    /// Insight failures are logged inside [`InsightService::generate_for_user`]
    /// and never fail the submission.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        entry: HealthLogEntry,
    ) -> Result<HealthLog, ApiError> {
        validate_health_log_entry(&entry)?;

        let entry = entry.at_stored_precision();
        let score = calculate_health_score(&entry);

        let created = HealthLogRepository::create_with_rolling_score(pool, user_id, &entry, score)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        metrics::counter!("health_logs_created_total").increment(1);
        info!(
            user_id = %user_id,
            calculated_score = score,
            health_score = created.health_score,
            "Health log created"
        );

        let log = HealthLog::try_from(created.record).map_err(ApiError::Internal)?;

        InsightService::generate_for_user(pool, user_id).await;

        Ok(log)
    }

    /// All of the user's logs, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<HealthLog>, ApiError> {
        let records = HealthLogRepository::list_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        into_logs(records).map_err(ApiError::Internal)
    }

    /// One log, which must belong to the caller
    pub async fn get(pool: &PgPool, user_id: Uuid, log_id: Uuid) -> Result<HealthLog, ApiError> {
        let record = HealthLogRepository::find_by_id(pool, log_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Health log not found".to_string()))?;

        if record.user_id != user_id {
            return Err(ApiError::Unauthorized("Not authorized".to_string()));
        }

        HealthLog::try_from(record).map_err(ApiError::Internal)
    }

    /// Newest log plus seven-day trend series
    pub async fn get_summary(pool: &PgPool, user_id: Uuid) -> Result<HealthSummary, ApiError> {
        let latest_log = HealthLogRepository::get_latest(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(HealthLog::try_from)
            .transpose()
            .map_err(ApiError::Internal)?;

        let records = HealthLogRepository::list_since(pool, user_id, window_start(Utc::now()))
            .await
            .map_err(ApiError::Internal)?;
        let logs = into_logs(records).map_err(ApiError::Internal)?;

        Ok(HealthSummary {
            latest_log,
            trends: build_trends(&logs),
        })
    }
}
