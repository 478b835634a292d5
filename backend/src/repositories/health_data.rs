//! Image analysis records

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wellness_shared::HealthDataRecord;

/// Number of analyses returned by the history endpoint
pub const HISTORY_LIMIT: i64 = 30;

/// Analysis row; the stored image is never selected
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthDataRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub stress_level: i16,
    pub stress_level_status: String,
    pub mood: String,
    pub relaxation_level: String,
    pub fatigue_level: i16,
    pub recommendations: Vec<String>,
    pub respiratory_rate: i16,
    pub respiratory_rate_status: String,
    pub heart_rate: i16,
    pub heart_rate_status: String,
    pub oxygen_saturation: i16,
    pub oxygen_saturation_status: String,
}

impl TryFrom<HealthDataRow> for HealthDataRecord {
    type Error = anyhow::Error;

    fn try_from(r: HealthDataRow) -> Result<Self> {
        Ok(HealthDataRecord {
            id: r.id,
            user_id: r.user_id,
            timestamp: r.timestamp,
            stress_level: u8::try_from(r.stress_level).context("stress level out of range")?,
            stress_level_status: r.stress_level_status.parse().map_err(anyhow::Error::msg)?,
            mood: r.mood.parse().map_err(anyhow::Error::msg)?,
            relaxation_level: r.relaxation_level.parse().map_err(anyhow::Error::msg)?,
            fatigue_level: u8::try_from(r.fatigue_level).context("fatigue level out of range")?,
            recommendations: r.recommendations,
            respiratory_rate: u8::try_from(r.respiratory_rate).context("respiratory rate out of range")?,
            respiratory_rate_status: r.respiratory_rate_status.parse().map_err(anyhow::Error::msg)?,
            heart_rate: u8::try_from(r.heart_rate).context("heart rate out of range")?,
            heart_rate_status: r.heart_rate_status.parse().map_err(anyhow::Error::msg)?,
            oxygen_saturation: u8::try_from(r.oxygen_saturation).context("oxygen saturation out of range")?,
            oxygen_saturation_status: r.oxygen_saturation_status.parse().map_err(anyhow::Error::msg)?,
        })
    }
}

pub struct HealthDataRepository;

impl HealthDataRepository {
    /// Store an analysis result, with the image only when given
    pub async fn create(
        pool: &PgPool,
        record: &HealthDataRecord,
        raw_image_data: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO health_data (
                id, user_id, timestamp, stress_level, stress_level_status, mood,
                relaxation_level, fatigue_level, recommendations,
                respiratory_rate, respiratory_rate_status, heart_rate, heart_rate_status,
                oxygen_saturation, oxygen_saturation_status, raw_image_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(record.timestamp)
        .bind(i16::from(record.stress_level))
        .bind(record.stress_level_status.as_str())
        .bind(record.mood.as_str())
        .bind(record.relaxation_level.as_str())
        .bind(i16::from(record.fatigue_level))
        .bind(&record.recommendations)
        .bind(i16::from(record.respiratory_rate))
        .bind(record.respiratory_rate_status.as_str())
        .bind(i16::from(record.heart_rate))
        .bind(record.heart_rate_status.as_str())
        .bind(i16::from(record.oxygen_saturation))
        .bind(record.oxygen_saturation_status.as_str())
        .bind(raw_image_data)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Most recent analyses for a user, newest first
    pub async fn list_recent(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<HealthDataRow>> {
        let rows = sqlx::query_as::<_, HealthDataRow>(
            r#"
            SELECT id, user_id, timestamp, stress_level, stress_level_status, mood,
                   relaxation_level, fatigue_level, recommendations,
                   respiratory_rate, respiratory_rate_status, heart_rate, heart_rate_status,
                   oxygen_saturation, oxygen_saturation_status
            FROM health_data
            WHERE user_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
