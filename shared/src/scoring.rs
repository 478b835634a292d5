//! Health score calculation
//!
//! A log's score starts from a neutral base and each present field nudges
//! it up or down. The user's overall score is the rounded mean of their
//! most recent log scores.

use crate::models::{EnergyLevel, HealthLogEntry, Mood, SleepQuality, SymptomSeverity};

/// Score of a log with no information in it
pub const BASE_SCORE: i32 = 50;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Number of most recent logs averaged into the user's health score
pub const ROLLING_WINDOW_LOGS: usize = 7;

/// Symptoms can never cost more than this in total
const MAX_SYMPTOM_PENALTY: i32 = 15;

/// Calculate the 0-100 score for one log entry
///
/// Pure and deterministic. Absent fields contribute nothing.
pub fn calculate_health_score(entry: &HealthLogEntry) -> i32 {
    let mut score = BASE_SCORE;

    if let Some(sleep) = &entry.sleep {
        if let Some(hours) = sleep.hours {
            score += sleep_hours_adjustment(hours);
        }
        if let Some(quality) = sleep.quality {
            score += sleep_quality_adjustment(quality);
        }
    }

    if let Some(mood) = entry.mood {
        score += mood_adjustment(mood);
    }

    if let Some(energy) = entry.energy {
        score += energy_adjustment(energy);
    }

    if let Some(glasses) = entry.water_glasses() {
        score += water_adjustment(glasses);
    }

    if let Some(exercise) = &entry.exercise {
        if exercise.did_exercise {
            score += match exercise.minutes {
                Some(m) if m >= 30 => 10,
                _ => 5,
            };
        }
    }

    if let Some(nutrition) = &entry.nutrition {
        let produce = nutrition.fruits.unwrap_or(0) + nutrition.vegetables.unwrap_or(0);
        score += match produce {
            p if p >= 5 => 6,
            p if p >= 3 => 3,
            _ => 0,
        };
        score += match nutrition.junk_food.unwrap_or(0) {
            j if j >= 3 => -6,
            j if j >= 1 => -2,
            _ => 0,
        };
        if nutrition.meals == Some(0) {
            score -= 4;
        }
    }

    let symptom_penalty: i32 = entry
        .symptoms
        .iter()
        .map(|s| match s.severity {
            SymptomSeverity::Mild => 2,
            SymptomSeverity::Moderate => 4,
            SymptomSeverity::Severe => 7,
        })
        .sum();
    score -= symptom_penalty.min(MAX_SYMPTOM_PENALTY);

    score.clamp(MIN_SCORE, MAX_SCORE)
}

fn sleep_hours_adjustment(hours: f64) -> i32 {
    if (7.0..=9.0).contains(&hours) {
        15
    } else if (6.0..7.0).contains(&hours) || (hours > 9.0 && hours <= 10.0) {
        7
    } else if (5.0..6.0).contains(&hours) {
        0
    } else {
        -10
    }
}

fn sleep_quality_adjustment(quality: SleepQuality) -> i32 {
    match quality {
        SleepQuality::Excellent => 8,
        SleepQuality::Good => 5,
        SleepQuality::Fair => 0,
        SleepQuality::Poor => -6,
    }
}

fn mood_adjustment(mood: Mood) -> i32 {
    match mood {
        Mood::Great => 10,
        Mood::Good => 6,
        Mood::Neutral => 0,
        Mood::Bad => -6,
        Mood::Terrible => -10,
    }
}

fn energy_adjustment(energy: EnergyLevel) -> i32 {
    match energy {
        EnergyLevel::VeryHigh => 6,
        EnergyLevel::High => 4,
        EnergyLevel::Moderate => 0,
        EnergyLevel::Low => -4,
        EnergyLevel::VeryLow => -6,
    }
}

fn water_adjustment(glasses: i32) -> i32 {
    match glasses {
        g if g >= 8 => 8,
        g if g >= 5 => 4,
        g if g >= 3 => 0,
        _ => -5,
    }
}

/// Rounded mean of the given log scores, `None` when there are none
///
/// Callers pass at most [`ROLLING_WINDOW_LOGS`] scores, newest first.
/// Halves round up.
pub fn rolling_health_score(scores: &[i32]) -> Option<i32> {
    if scores.is_empty() {
        return None;
    }
    let n = scores.len() as i64;
    let sum: i64 = scores.iter().map(|&s| s as i64).sum();
    // floor((2*sum + n) / 2n) == floor(mean + 0.5)
    Some((2 * sum + n).div_euclid(2 * n) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseEntry, NutritionEntry, SleepEntry, Symptom, WaterEntry};
    use proptest::prelude::*;
    use rstest::rstest;

    fn sleep_only(hours: f64) -> HealthLogEntry {
        HealthLogEntry {
            sleep: Some(SleepEntry { hours: Some(hours), quality: None }),
            ..Default::default()
        }
    }

    fn symptom(severity: SymptomSeverity) -> Symptom {
        Symptom {
            name: "headache".to_string(),
            severity,
            notes: None,
        }
    }

    #[test]
    fn test_empty_entry_scores_base() {
        assert_eq!(calculate_health_score(&HealthLogEntry::default()), BASE_SCORE);
    }

    #[rstest]
    #[case(8.0, 65)]
    #[case(7.0, 65)]
    #[case(9.0, 65)]
    #[case(6.5, 57)]
    #[case(9.5, 57)]
    #[case(10.0, 57)]
    #[case(5.5, 50)]
    #[case(4.0, 40)]
    #[case(11.0, 40)]
    fn test_sleep_hour_bands(#[case] hours: f64, #[case] expected: i32) {
        assert_eq!(calculate_health_score(&sleep_only(hours)), expected);
    }

    #[rstest]
    #[case(10, 58)]
    #[case(8, 58)]
    #[case(6, 54)]
    #[case(3, 50)]
    #[case(0, 45)]
    fn test_water_bands(#[case] glasses: i32, #[case] expected: i32) {
        let entry = HealthLogEntry {
            water: Some(WaterEntry { glasses: Some(glasses) }),
            ..Default::default()
        };
        assert_eq!(calculate_health_score(&entry), expected);
    }

    #[test]
    fn test_exercise_requires_flag() {
        let skipped = HealthLogEntry {
            exercise: Some(ExerciseEntry {
                did_exercise: false,
                minutes: Some(60),
                kind: None,
            }),
            ..Default::default()
        };
        assert_eq!(calculate_health_score(&skipped), 50);

        let short = HealthLogEntry {
            exercise: Some(ExerciseEntry {
                did_exercise: true,
                minutes: Some(15),
                kind: None,
            }),
            ..Default::default()
        };
        assert_eq!(calculate_health_score(&short), 55);

        let long = HealthLogEntry {
            exercise: Some(ExerciseEntry {
                did_exercise: true,
                minutes: Some(45),
                kind: Some("run".to_string()),
            }),
            ..Default::default()
        };
        assert_eq!(calculate_health_score(&long), 60);
    }

    #[test]
    fn test_nutrition_adjustments() {
        let entry = HealthLogEntry {
            nutrition: Some(NutritionEntry {
                meals: Some(0),
                junk_food: Some(4),
                fruits: Some(2),
                vegetables: Some(3),
            }),
            ..Default::default()
        };
        // +6 produce, -6 junk, -4 skipped meals
        assert_eq!(calculate_health_score(&entry), 46);
    }

    #[test]
    fn test_symptom_penalty_is_capped() {
        let entry = HealthLogEntry {
            symptoms: vec![
                symptom(SymptomSeverity::Severe),
                symptom(SymptomSeverity::Severe),
                symptom(SymptomSeverity::Severe),
            ],
            ..Default::default()
        };
        assert_eq!(calculate_health_score(&entry), 35);
    }

    #[test]
    fn test_best_and_worst_days_clamp() {
        let best = HealthLogEntry {
            sleep: Some(SleepEntry {
                hours: Some(8.0),
                quality: Some(SleepQuality::Excellent),
            }),
            mood: Some(Mood::Great),
            energy: Some(EnergyLevel::VeryHigh),
            water: Some(WaterEntry { glasses: Some(10) }),
            exercise: Some(ExerciseEntry {
                did_exercise: true,
                minutes: Some(60),
                kind: None,
            }),
            nutrition: Some(NutritionEntry {
                meals: Some(3),
                junk_food: Some(0),
                fruits: Some(3),
                vegetables: Some(4),
            }),
            ..Default::default()
        };
        assert_eq!(calculate_health_score(&best), 100);

        let worst = HealthLogEntry {
            sleep: Some(SleepEntry {
                hours: Some(2.0),
                quality: Some(SleepQuality::Poor),
            }),
            mood: Some(Mood::Terrible),
            energy: Some(EnergyLevel::VeryLow),
            water: Some(WaterEntry { glasses: Some(0) }),
            nutrition: Some(NutritionEntry {
                meals: Some(0),
                junk_food: Some(5),
                ..Default::default()
            }),
            symptoms: vec![symptom(SymptomSeverity::Severe); 3],
            ..Default::default()
        };
        assert_eq!(calculate_health_score(&worst), 0);
    }

    #[test]
    fn test_rolling_score() {
        assert_eq!(rolling_health_score(&[]), None);
        assert_eq!(rolling_health_score(&[70]), Some(70));
        assert_eq!(rolling_health_score(&[70, 71]), Some(71));
        assert_eq!(rolling_health_score(&[60, 61, 61]), Some(61));
        assert_eq!(rolling_health_score(&[0, 0, 1]), Some(0));
    }

    fn arb_entry() -> impl Strategy<Value = HealthLogEntry> {
        let quality = prop::option::of(prop_oneof![
            Just(SleepQuality::Poor),
            Just(SleepQuality::Fair),
            Just(SleepQuality::Good),
            Just(SleepQuality::Excellent),
        ]);
        let mood = prop::option::of(prop_oneof![
            Just(Mood::Terrible),
            Just(Mood::Bad),
            Just(Mood::Neutral),
            Just(Mood::Good),
            Just(Mood::Great),
        ]);
        let energy = prop::option::of(prop_oneof![
            Just(EnergyLevel::VeryLow),
            Just(EnergyLevel::Low),
            Just(EnergyLevel::Moderate),
            Just(EnergyLevel::High),
            Just(EnergyLevel::VeryHigh),
        ]);
        let severity = prop_oneof![
            Just(SymptomSeverity::Mild),
            Just(SymptomSeverity::Moderate),
            Just(SymptomSeverity::Severe),
        ];
        (
            prop::option::of(0.0f64..=24.0),
            quality,
            mood,
            energy,
            prop::option::of(0i32..30),
            prop::option::of((any::<bool>(), prop::option::of(0i32..300))),
            prop::option::of((0i32..6, 0i32..10, 0i32..10, 0i32..10)),
            prop::collection::vec(severity, 0..6),
        )
            .prop_map(|(hours, quality, mood, energy, glasses, exercise, nutrition, symptoms)| {
                HealthLogEntry {
                    sleep: Some(SleepEntry { hours, quality }),
                    mood,
                    energy,
                    water: glasses.map(|g| WaterEntry { glasses: Some(g) }),
                    exercise: exercise.map(|(did, minutes)| ExerciseEntry {
                        did_exercise: did,
                        minutes,
                        kind: None,
                    }),
                    nutrition: nutrition.map(|(meals, junk, fruits, veg)| NutritionEntry {
                        meals: Some(meals),
                        junk_food: Some(junk),
                        fruits: Some(fruits),
                        vegetables: Some(veg),
                    }),
                    symptoms: symptoms.into_iter().map(symptom).collect(),
                    notes: None,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_score_within_bounds(entry in arb_entry()) {
            let score = calculate_health_score(&entry);
            prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
        }

        #[test]
        fn prop_score_deterministic(entry in arb_entry()) {
            prop_assert_eq!(calculate_health_score(&entry), calculate_health_score(&entry.clone()));
        }

        #[test]
        fn prop_rolling_score_between_min_and_max(scores in prop::collection::vec(0i32..=100, 1..=ROLLING_WINDOW_LOGS)) {
            let avg = rolling_health_score(&scores).unwrap();
            let lo = *scores.iter().min().unwrap();
            let hi = *scores.iter().max().unwrap();
            prop_assert!(avg >= lo && avg <= hi);
        }
    }
}
