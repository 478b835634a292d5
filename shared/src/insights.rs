//! Rule-based insight generation
//!
//! Rules look at a user's logs from the trailing window and each one may
//! emit a single insight. All rules are evaluated independently; the
//! result may be empty.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{HealthLog, InsightDraft, InsightSeverity, InsightType};

/// Below this many logs in the window no rule is evaluated
pub const MIN_LOGS: usize = 3;

/// Below this many logs the exercise rule stays quiet
pub const MIN_LOGS_EXERCISE: usize = 5;

pub const LOW_SLEEP_HOURS: f64 = 6.0;
pub const LOW_WATER_GLASSES: f64 = 5.0;
pub const LOW_MOOD_AVERAGE: f64 = 2.5;
pub const LOW_EXERCISE_RATE: f64 = 0.3;

/// Evaluate every rule against the window's logs
pub fn generate_insights(logs: &[HealthLog]) -> Vec<InsightDraft> {
    if logs.len() < MIN_LOGS {
        return Vec::new();
    }

    [
        low_sleep(logs),
        low_water(logs),
        low_mood(logs),
        low_exercise(logs),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn low_sleep(logs: &[HealthLog]) -> Option<InsightDraft> {
    let hours: Vec<f64> = logs
        .iter()
        .filter_map(|l| l.entry.sleep_hours())
        .filter(|h| *h != 0.0)
        .collect();
    if hours.len() < MIN_LOGS {
        return None;
    }

    let avg = mean(&hours);
    if avg >= LOW_SLEEP_HOURS {
        return None;
    }

    Some(InsightDraft {
        insight_type: InsightType::Pattern,
        title: "Low Sleep Detected".to_string(),
        description: format!(
            "You've been averaging {} hours of sleep, which is below the recommended 7-9 hours.",
            format_one_decimal(avg)
        ),
        metrics: vec!["sleep".to_string()],
        severity: InsightSeverity::Medium,
        suggested_actions: strings(&[
            "Try to go to bed 30 minutes earlier",
            "Limit screen time before bed",
            "Create a relaxing bedtime routine",
        ]),
    })
}

fn low_water(logs: &[HealthLog]) -> Option<InsightDraft> {
    let glasses: Vec<f64> = logs
        .iter()
        .filter_map(|l| l.entry.water_glasses())
        .map(f64::from)
        .collect();
    if glasses.len() < MIN_LOGS {
        return None;
    }

    let avg = mean(&glasses);
    if avg >= LOW_WATER_GLASSES {
        return None;
    }

    Some(InsightDraft {
        insight_type: InsightType::Suggestion,
        title: "Increase Water Intake".to_string(),
        description: format!(
            "You've been drinking an average of {} glasses of water daily. Consider increasing to at least 8 glasses.",
            format_one_decimal(avg)
        ),
        metrics: vec!["water".to_string()],
        severity: InsightSeverity::Low,
        suggested_actions: strings(&[
            "Keep a water bottle nearby",
            "Set reminders to drink water throughout the day",
            "Drink a glass of water before each meal",
        ]),
    })
}

fn low_mood(logs: &[HealthLog]) -> Option<InsightDraft> {
    let moods: Vec<f64> = logs
        .iter()
        .filter_map(|l| l.entry.mood)
        .map(|m| f64::from(m.ordinal()))
        .collect();
    if moods.len() < MIN_LOGS || mean(&moods) >= LOW_MOOD_AVERAGE {
        return None;
    }

    Some(InsightDraft {
        insight_type: InsightType::Alert,
        title: "Mood Alert".to_string(),
        description: "Your mood has been consistently low recently. This may be affecting your overall well-being."
            .to_string(),
        metrics: vec!["mood".to_string()],
        severity: InsightSeverity::High,
        suggested_actions: strings(&[
            "Try to engage in activities you enjoy",
            "Consider speaking with a mental health professional",
            "Practice mindfulness or meditation",
            "Get some sunlight and fresh air daily",
        ]),
    })
}

fn low_exercise(logs: &[HealthLog]) -> Option<InsightDraft> {
    if logs.len() < MIN_LOGS_EXERCISE {
        return None;
    }

    let exercise_days = logs.iter().filter(|l| l.entry.did_exercise()).count();
    let rate = exercise_days as f64 / logs.len() as f64;
    if rate >= LOW_EXERCISE_RATE {
        return None;
    }

    Some(InsightDraft {
        insight_type: InsightType::Suggestion,
        title: "Increase Physical Activity".to_string(),
        description: format!(
            "You've only exercised on {} of the last {} days. Regular physical activity can boost your mood and energy.",
            exercise_days,
            logs.len()
        ),
        metrics: vec!["exercise".to_string()],
        severity: InsightSeverity::Medium,
        suggested_actions: strings(&[
            "Try a short daily walk",
            "Consider body-weight exercises that don't require equipment",
            "Find a physical activity you enjoy",
            "Start with just 10-15 minutes of movement daily",
        ]),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// One decimal place, ties rounded away from zero
///
/// Rounds the exact binary value, so an average such as `17.4 / 4`
/// (stored as 4.34999...) prints as "4.3".
pub fn format_one_decimal(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded = exact.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(1);
            rounded.to_string()
        }
        None => format!("{:.1}", value),
    }
}
