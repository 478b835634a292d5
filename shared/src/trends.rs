//! Seven-day trend series for the dashboard charts

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::HealthLog;

/// Length of the trend and insight window in days
pub const TREND_WINDOW_DAYS: i64 = 7;

/// Inclusive lower bound of the trailing window ending at `now`
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(TREND_WINDOW_DAYS)
}

/// One chart point; `date` is the UTC calendar day of the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthTrends {
    pub sleep: Vec<TrendPoint>,
    pub mood: Vec<TrendPoint>,
    pub water: Vec<TrendPoint>,
    pub exercise: Vec<TrendPoint>,
    pub scores: Vec<TrendPoint>,
}

/// Reduce windowed logs into per-metric series, oldest first
///
/// Zero-valued sleep, water, exercise minutes and scores are treated as
/// "not recorded" and produce no point. Mood is plotted whenever present.
pub fn build_trends(logs: &[HealthLog]) -> HealthTrends {
    let mut ordered: Vec<&HealthLog> = logs.iter().collect();
    ordered.sort_by_key(|log| log.date);

    let mut trends = HealthTrends::default();

    for log in ordered {
        let date = log.date.format("%Y-%m-%d").to_string();
        let point = |value: f64| TrendPoint {
            date: date.clone(),
            value,
        };

        if let Some(hours) = log.entry.sleep_hours().filter(|h| *h != 0.0) {
            trends.sleep.push(point(hours));
        }
        if let Some(mood) = log.entry.mood {
            trends.mood.push(point(mood.ordinal() as f64));
        }
        if let Some(glasses) = log.entry.water_glasses().filter(|g| *g != 0) {
            trends.water.push(point(glasses as f64));
        }
        if let Some(minutes) = log.entry.exercise_minutes().filter(|m| *m != 0) {
            trends.exercise.push(point(minutes as f64));
        }
        if log.calculated_score != 0 {
            trends.scores.push(point(log.calculated_score as f64));
        }
    }

    trends
}
