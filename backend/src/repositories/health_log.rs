//! Health log repository for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use wellness_shared::scoring::{rolling_health_score, ROLLING_WINDOW_LOGS};
use wellness_shared::{
    stored_sleep_hours, ExerciseEntry, HealthLog, HealthLogEntry, NutritionEntry, SleepEntry,
    Symptom, WaterEntry,
};

use super::user::UserRepository;

/// Health log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub sleep_hours: Option<Decimal>,
    pub sleep_quality: Option<String>,
    pub mood: Option<String>,
    pub energy: Option<String>,
    pub water_glasses: Option<i32>,
    pub did_exercise: Option<bool>,
    pub exercise_minutes: Option<i32>,
    pub exercise_type: Option<String>,
    pub nutrition_meals: Option<i32>,
    pub nutrition_junk_food: Option<i32>,
    pub nutrition_fruits: Option<i32>,
    pub nutrition_vegetables: Option<i32>,
    pub symptoms: Json<Vec<Symptom>>,
    pub notes: Option<String>,
    pub calculated_score: i32,
}

fn parse_opt<T: std::str::FromStr<Err = String>>(value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| v.parse::<T>().map_err(anyhow::Error::msg))
        .transpose()
}

impl TryFrom<HealthLogRecord> for HealthLog {
    type Error = anyhow::Error;

    fn try_from(r: HealthLogRecord) -> Result<Self> {
        let sleep_hours = r.sleep_hours.and_then(|d| d.to_f64());
        let sleep_quality = parse_opt(r.sleep_quality)?;
        let sleep = (sleep_hours.is_some() || sleep_quality.is_some()).then_some(SleepEntry {
            hours: sleep_hours,
            quality: sleep_quality,
        });

        let exercise = (r.did_exercise.is_some()
            || r.exercise_minutes.is_some()
            || r.exercise_type.is_some())
        .then(|| ExerciseEntry {
            did_exercise: r.did_exercise.unwrap_or(false),
            minutes: r.exercise_minutes,
            kind: r.exercise_type,
        });

        let nutrition = NutritionEntry {
            meals: r.nutrition_meals,
            junk_food: r.nutrition_junk_food,
            fruits: r.nutrition_fruits,
            vegetables: r.nutrition_vegetables,
        };
        let nutrition = (nutrition != NutritionEntry::default()).then_some(nutrition);

        Ok(HealthLog {
            id: r.id,
            user: r.user_id,
            date: r.date,
            entry: HealthLogEntry {
                sleep,
                mood: parse_opt(r.mood)?,
                energy: parse_opt(r.energy)?,
                water: r.water_glasses.map(|g| WaterEntry { glasses: Some(g) }),
                exercise,
                nutrition,
                symptoms: r.symptoms.0,
                notes: r.notes,
            },
            calculated_score: r.calculated_score,
        })
    }
}

/// Convert a batch of records, failing on the first bad row
pub fn into_logs(records: Vec<HealthLogRecord>) -> Result<Vec<HealthLog>> {
    records.into_iter().map(HealthLog::try_from).collect()
}

/// A saved log together with the owner's recomputed score
#[derive(Debug, Clone)]
pub struct CreatedHealthLog {
    pub record: HealthLogRecord,
    pub health_score: i32,
}

/// Health log repository for database operations
pub struct HealthLogRepository;

impl HealthLogRepository {
    /// Insert a log and refresh the owner's rolling health score
    ///
    /// The owner's row is locked first, so concurrent submissions for one
    /// user are applied one after another. Returns `None` if the user does
    /// not exist.
    pub async fn create_with_rolling_score(
        pool: &PgPool,
        user_id: Uuid,
        entry: &HealthLogEntry,
        calculated_score: i32,
    ) -> Result<Option<CreatedHealthLog>> {
        let mut tx = pool.begin().await?;

        if !UserRepository::lock_for_update(&mut tx, user_id).await? {
            return Ok(None);
        }

        let sleep_hours = entry
            .sleep_hours()
            .map(|h| stored_sleep_hours(h).context("sleep hours out of range"))
            .transpose()?;
        let exercise = entry.exercise.as_ref();
        let nutrition = entry.nutrition.as_ref();

        let record = sqlx::query_as::<_, HealthLogRecord>(
            r#"
            INSERT INTO health_logs (
                user_id, sleep_hours, sleep_quality, mood, energy, water_glasses,
                did_exercise, exercise_minutes, exercise_type,
                nutrition_meals, nutrition_junk_food, nutrition_fruits, nutrition_vegetables,
                symptoms, notes, calculated_score
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id, user_id, date, sleep_hours, sleep_quality, mood, energy, water_glasses,
                      did_exercise, exercise_minutes, exercise_type,
                      nutrition_meals, nutrition_junk_food, nutrition_fruits, nutrition_vegetables,
                      symptoms, notes, calculated_score
            "#,
        )
        .bind(user_id)
        .bind(sleep_hours)
        .bind(entry.sleep.as_ref().and_then(|s| s.quality).map(|q| q.as_str()))
        .bind(entry.mood.map(|m| m.as_str()))
        .bind(entry.energy.map(|e| e.as_str()))
        .bind(entry.water_glasses())
        .bind(exercise.map(|e| e.did_exercise))
        .bind(exercise.and_then(|e| e.minutes))
        .bind(exercise.and_then(|e| e.kind.as_deref()))
        .bind(nutrition.and_then(|n| n.meals))
        .bind(nutrition.and_then(|n| n.junk_food))
        .bind(nutrition.and_then(|n| n.fruits))
        .bind(nutrition.and_then(|n| n.vegetables))
        .bind(Json(&entry.symptoms))
        .bind(&entry.notes)
        .bind(calculated_score)
        .fetch_one(&mut *tx)
        .await?;

        let recent: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT calculated_score
            FROM health_logs
            WHERE user_id = $1
            ORDER BY date DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(ROLLING_WINDOW_LOGS as i64)
        .fetch_all(&mut *tx)
        .await?;

        let scores: Vec<i32> = recent.into_iter().map(|(s,)| s).collect();
        // The new log is always among the recent ones
        let health_score = rolling_health_score(&scores).unwrap_or(calculated_score);
        UserRepository::set_health_score(&mut tx, user_id, health_score).await?;

        tx.commit().await?;

        Ok(Some(CreatedHealthLog {
            record,
            health_score,
        }))
    }

    /// All of a user's logs, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<HealthLogRecord>> {
        let records = sqlx::query_as::<_, HealthLogRecord>(
            r#"
            SELECT id, user_id, date, sleep_hours, sleep_quality, mood, energy, water_glasses,
                   did_exercise, exercise_minutes, exercise_type,
                   nutrition_meals, nutrition_junk_food, nutrition_fruits, nutrition_vegetables,
                   symptoms, notes, calculated_score
            FROM health_logs
            WHERE user_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Find a log by id regardless of owner
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<HealthLogRecord>> {
        let record = sqlx::query_as::<_, HealthLogRecord>(
            r#"
            SELECT id, user_id, date, sleep_hours, sleep_quality, mood, energy, water_glasses,
                   did_exercise, exercise_minutes, exercise_type,
                   nutrition_meals, nutrition_junk_food, nutrition_fruits, nutrition_vegetables,
                   symptoms, notes, calculated_score
            FROM health_logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// The most recent log for a user
    pub async fn get_latest(pool: &PgPool, user_id: Uuid) -> Result<Option<HealthLogRecord>> {
        let record = sqlx::query_as::<_, HealthLogRecord>(
            r#"
            SELECT id, user_id, date, sleep_hours, sleep_quality, mood, energy, water_glasses,
                   did_exercise, exercise_minutes, exercise_type,
                   nutrition_meals, nutrition_junk_food, nutrition_fruits, nutrition_vegetables,
                   symptoms, notes, calculated_score
            FROM health_logs
            WHERE user_id = $1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Logs dated at or after `since`, oldest first
    pub async fn list_since(
        pool: &PgPool,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<HealthLogRecord>> {
        let records = sqlx::query_as::<_, HealthLogRecord>(
            r#"
            SELECT id, user_id, date, sleep_hours, sleep_quality, mood, energy, water_glasses,
                   did_exercise, exercise_minutes, exercise_type,
                   nutrition_meals, nutrition_junk_food, nutrition_fruits, nutrition_vegetables,
                   symptoms, notes, calculated_score
            FROM health_logs
            WHERE user_id = $1 AND date >= $2
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_shared::{EnergyLevel, Mood, SleepQuality, SymptomSeverity};

    fn blank_record() -> HealthLogRecord {
        HealthLogRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: Utc::now(),
            sleep_hours: None,
            sleep_quality: None,
            mood: None,
            energy: None,
            water_glasses: None,
            did_exercise: None,
            exercise_minutes: None,
            exercise_type: None,
            nutrition_meals: None,
            nutrition_junk_food: None,
            nutrition_fruits: None,
            nutrition_vegetables: None,
            symptoms: Json(vec![]),
            notes: None,
            calculated_score: 50,
        }
    }

    #[test]
    fn test_blank_record_has_no_sections() {
        let log = HealthLog::try_from(blank_record()).unwrap();
        assert_eq!(log.entry, HealthLogEntry::default());
        assert_eq!(log.calculated_score, 50);
    }

    #[test]
    fn test_record_columns_map_to_sections() {
        let record = HealthLogRecord {
            sleep_hours: Some(Decimal::new(750, 2)),
            sleep_quality: Some("good".to_string()),
            mood: Some("great".to_string()),
            energy: Some("very high".to_string()),
            water_glasses: Some(0),
            did_exercise: Some(false),
            nutrition_fruits: Some(2),
            symptoms: Json(vec![Symptom {
                name: "cough".to_string(),
                severity: SymptomSeverity::Moderate,
                notes: None,
            }]),
            ..blank_record()
        };

        let log = HealthLog::try_from(record).unwrap();
        let entry = log.entry;
        assert_eq!(entry.sleep_hours(), Some(7.5));
        assert_eq!(entry.sleep.unwrap().quality, Some(SleepQuality::Good));
        assert_eq!(entry.mood, Some(Mood::Great));
        assert_eq!(entry.energy, Some(EnergyLevel::VeryHigh));
        assert_eq!(entry.water.unwrap().glasses, Some(0));
        assert!(!entry.exercise.unwrap().did_exercise);
        assert_eq!(entry.nutrition.unwrap().fruits, Some(2));
        assert_eq!(entry.symptoms.len(), 1);
    }

    #[test]
    fn test_unknown_enum_text_is_error() {
        let record = HealthLogRecord {
            mood: Some("ecstatic".to_string()),
            ..blank_record()
        };
        assert!(HealthLog::try_from(record).is_err());
    }
}
