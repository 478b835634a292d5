//! Insight repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wellness_shared::{HealthInsight, InsightDraft};

/// Insight record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InsightRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub insight_type: String,
    pub title: String,
    pub description: String,
    pub metrics: Vec<String>,
    pub severity: String,
    pub is_read: bool,
    pub action_taken: bool,
    pub suggested_actions: Vec<String>,
}

impl TryFrom<InsightRecord> for HealthInsight {
    type Error = anyhow::Error;

    fn try_from(r: InsightRecord) -> Result<Self> {
        Ok(HealthInsight {
            id: r.id,
            user: r.user_id,
            date: r.date,
            insight_type: r.insight_type.parse().map_err(anyhow::Error::msg)?,
            title: r.title,
            description: r.description,
            metrics: r.metrics,
            severity: r.severity.parse().map_err(anyhow::Error::msg)?,
            is_read: r.is_read,
            action_taken: r.action_taken,
            suggested_actions: r.suggested_actions,
        })
    }
}

pub fn into_insights(records: Vec<InsightRecord>) -> Result<Vec<HealthInsight>> {
    records.into_iter().map(HealthInsight::try_from).collect()
}

/// Insight repository for database operations
pub struct InsightRepository;

impl InsightRepository {
    /// Persist a generator batch atomically
    pub async fn insert_many(
        pool: &PgPool,
        user_id: Uuid,
        drafts: &[InsightDraft],
    ) -> Result<Vec<InsightRecord>> {
        let mut tx = pool.begin().await?;
        let mut saved = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let record = sqlx::query_as::<_, InsightRecord>(
                r#"
                INSERT INTO health_insights
                    (user_id, insight_type, title, description, metrics, severity, suggested_actions)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, user_id, date, insight_type, title, description, metrics,
                          severity, is_read, action_taken, suggested_actions
                "#,
            )
            .bind(user_id)
            .bind(draft.insight_type.as_str())
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.metrics)
            .bind(draft.severity.as_str())
            .bind(&draft.suggested_actions)
            .fetch_one(&mut *tx)
            .await?;

            saved.push(record);
        }

        tx.commit().await?;

        Ok(saved)
    }

    /// All insights for a user, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<InsightRecord>> {
        let records = sqlx::query_as::<_, InsightRecord>(
            r#"
            SELECT id, user_id, date, insight_type, title, description, metrics,
                   severity, is_read, action_taken, suggested_actions
            FROM health_insights
            WHERE user_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Unread insights for a user, newest first
    pub async fn list_unread(pool: &PgPool, user_id: Uuid) -> Result<Vec<InsightRecord>> {
        let records = sqlx::query_as::<_, InsightRecord>(
            r#"
            SELECT id, user_id, date, insight_type, title, description, metrics,
                   severity, is_read, action_taken, suggested_actions
            FROM health_insights
            WHERE user_id = $1 AND NOT is_read
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<InsightRecord>> {
        let record = sqlx::query_as::<_, InsightRecord>(
            r#"
            SELECT id, user_id, date, insight_type, title, description, metrics,
                   severity, is_read, action_taken, suggested_actions
            FROM health_insights
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Set `is_read`
    pub async fn mark_read(pool: &PgPool, id: Uuid) -> Result<InsightRecord> {
        let record = sqlx::query_as::<_, InsightRecord>(
            r#"
            UPDATE health_insights
            SET is_read = TRUE
            WHERE id = $1
            RETURNING id, user_id, date, insight_type, title, description, metrics,
                      severity, is_read, action_taken, suggested_actions
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Set `action_taken`, which also marks the insight read
    pub async fn mark_action_taken(pool: &PgPool, id: Uuid) -> Result<InsightRecord> {
        let record = sqlx::query_as::<_, InsightRecord>(
            r#"
            UPDATE health_insights
            SET action_taken = TRUE, is_read = TRUE
            WHERE id = $1
            RETURNING id, user_id, date, insight_type, title, description, metrics,
                      severity, is_read, action_taken, suggested_actions
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
