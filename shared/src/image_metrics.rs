//! Mapping from facial-expression attributes to wellness metrics
//!
//! Emotion scores are on a 0-100 scale as reported by the face detector.
//! Derived stress and fatigue levels are on a 1-10 scale.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::MetricsError;
use std::ops::RangeInclusive;

use crate::models::{
    ExpressionMood, HealthDataRecord, ImageHealthMetrics, RelaxationLevel, StressStatus,
    VitalSigns, VitalStatus,
};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;

/// Attributes of one detected face; missing values are zero
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceAttributes {
    pub anger: f64,
    pub disgust: f64,
    pub fear: f64,
    pub happiness: f64,
    pub neutral: f64,
    pub sadness: f64,
    pub smile: f64,
    /// Head pitch in degrees
    pub head_pitch: f64,
}

/// Metrics before recommendations are attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedMetrics {
    pub stress_level: u8,
    pub mood: ExpressionMood,
    pub relaxation_level: RelaxationLevel,
    pub fatigue_level: u8,
}

impl DerivedMetrics {
    /// Metrics when only stress and fatigue are known
    ///
    /// Mood and relaxation fall back to the stress-based defaults.
    pub fn from_stress_and_fatigue(stress_level: u8, fatigue_level: u8) -> Self {
        let stress_level = clamp_level(f64::from(stress_level));
        Self {
            stress_level,
            mood: mood_from_stress(stress_level),
            relaxation_level: relaxation_from_stress(stress_level),
            fatigue_level: clamp_level(f64::from(fatigue_level)),
        }
    }

    /// Attach recommendations
    pub fn into_report(self) -> ImageHealthMetrics {
        ImageHealthMetrics {
            stress_level: self.stress_level,
            mood: self.mood,
            relaxation_level: self.relaxation_level,
            fatigue_level: self.fatigue_level,
            recommendations: generate_recommendations(&self),
        }
    }
}

fn clamp_level(value: f64) -> u8 {
    value.clamp(f64::from(MIN_LEVEL), f64::from(MAX_LEVEL)) as u8
}

/// Stress from negative emotions and the absence of a neutral expression
pub fn stress_from_emotions(face: &FaceAttributes) -> u8 {
    let indicators = [
        face.anger,
        face.fear,
        face.disgust,
        face.sadness,
        100.0 - face.neutral,
    ];
    let avg = indicators.iter().sum::<f64>() / indicators.len() as f64;
    clamp_level((avg / 10.0).ceil())
}

pub fn mood_from_face(face: &FaceAttributes, stress_level: u8) -> ExpressionMood {
    if face.happiness > 50.0 || face.smile > 50.0 {
        ExpressionMood::Happy
    } else if face.sadness > 30.0 || face.anger > 30.0 || stress_level > 7 {
        ExpressionMood::Sad
    } else {
        ExpressionMood::Neutral
    }
}

/// Fatigue from low happiness, sadness and a drooping head
pub fn fatigue_from_face(face: &FaceAttributes) -> u8 {
    let indicators = [
        (100.0 - face.happiness) / 20.0,
        face.sadness / 20.0,
        face.head_pitch.abs() / 9.0,
    ];
    let avg = indicators.iter().sum::<f64>() / indicators.len() as f64;
    clamp_level((avg * 2.0).ceil())
}

pub fn relaxation_from_stress(stress_level: u8) -> RelaxationLevel {
    match stress_level {
        0..=3 => RelaxationLevel::High,
        4..=6 => RelaxationLevel::Moderate,
        _ => RelaxationLevel::Low,
    }
}

/// Default mood when no expression is available
pub fn mood_from_stress(stress_level: u8) -> ExpressionMood {
    match stress_level {
        0..=3 => ExpressionMood::Happy,
        4..=7 => ExpressionMood::Neutral,
        _ => ExpressionMood::Sad,
    }
}

pub fn stress_status(stress_level: u8) -> StressStatus {
    match stress_level {
        0..=3 => StressStatus::Low,
        4..=7 => StressStatus::Moderate,
        _ => StressStatus::High,
    }
}

/// Ranges simulated vitals are drawn from
pub const RESPIRATORY_RATE_RANGE: RangeInclusive<u8> = 12..=19;
pub const HEART_RATE_RANGE: RangeInclusive<u8> = 60..=99;
pub const OXYGEN_SATURATION_RANGE: RangeInclusive<u8> = 94..=99;

/// Normal is 12-20 breaths/min
pub fn respiratory_rate_status(rate: u8) -> VitalStatus {
    match rate {
        0..=11 => VitalStatus::Low,
        12..=20 => VitalStatus::Normal,
        _ => VitalStatus::High,
    }
}

/// Normal is 60-100 bpm
pub fn heart_rate_status(rate: u8) -> VitalStatus {
    match rate {
        0..=59 => VitalStatus::Low,
        60..=100 => VitalStatus::Normal,
        _ => VitalStatus::High,
    }
}

/// Saturation never reads High
pub fn oxygen_saturation_status(percent: u8) -> VitalStatus {
    match percent {
        0..=94 => VitalStatus::Low,
        _ => VitalStatus::Normal,
    }
}

pub fn derive_from_face(face: &FaceAttributes) -> DerivedMetrics {
    let stress_level = stress_from_emotions(face);
    DerivedMetrics {
        stress_level,
        mood: mood_from_face(face, stress_level),
        relaxation_level: relaxation_from_stress(stress_level),
        fatigue_level: fatigue_from_face(face),
    }
}

/// Derive metrics from the first detected face
pub fn derive_from_first_face(faces: &[FaceAttributes]) -> Result<DerivedMetrics, MetricsError> {
    faces
        .first()
        .map(derive_from_face)
        .ok_or(MetricsError::NoFaceDetected)
}

const GENERAL_RECOMMENDATIONS: [&str; 3] = [
    "Stay hydrated by drinking at least 8 glasses of water daily.",
    "Aim for 7-9 hours of quality sleep each night for optimal health.",
    "Include at least 30 minutes of moderate physical activity in your daily routine.",
];

/// One sentence each for stress, mood, relaxation and fatigue, then the
/// general advice
pub fn generate_recommendations(metrics: &DerivedMetrics) -> Vec<String> {
    let stress = match metrics.stress_level {
        7.. => "Your facial expressions indicate high stress. Consider practicing mindfulness or relaxation techniques.",
        4..=6 => "You appear to have moderate stress levels. Taking short breaks and deep breathing may be beneficial.",
        _ => "Your facial analysis shows low stress levels. Keep up with your stress management practices!",
    };

    let mood = match metrics.mood {
        ExpressionMood::Sad => "Your facial expressions suggest you may be feeling down. Take some time for self-care or speak to a loved one.",
        ExpressionMood::Neutral => "Your mood appears balanced. Consider activities that bring you joy to enhance your wellbeing.",
        ExpressionMood::Happy => "Your facial expressions indicate a positive mood! Stay positive and maintain your well-being practices.",
    };

    let relaxation = match metrics.relaxation_level {
        RelaxationLevel::Low => "Your facial features suggest tension. Consider stretching exercises or progressive muscle relaxation.",
        RelaxationLevel::Moderate => "You appear moderately relaxed. Regular short meditation sessions could help increase relaxation.",
        RelaxationLevel::High => "Analysis shows you appear well-relaxed. Maintain these good relaxation states with continued self-care.",
    };

    let fatigue = match metrics.fatigue_level {
        7.. => "Your facial features suggest fatigue. Ensure you're getting enough sleep and consider adjusting your sleep schedule.",
        4..=6 => "You show moderate signs of fatigue. Try to incorporate short power naps or better sleep hygiene.",
        _ => "You appear well-rested based on facial analysis. Keep up your energy levels with regular activity breaks.",
    };

    [stress, mood, relaxation, fatigue]
        .into_iter()
        .chain(GENERAL_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}

/// Build the persisted record for an analysis
pub fn to_record(
    id: Uuid,
    user_id: Uuid,
    timestamp: DateTime<Utc>,
    metrics: &ImageHealthMetrics,
    vitals: VitalSigns,
) -> HealthDataRecord {
    HealthDataRecord {
        id,
        user_id,
        timestamp,
        stress_level: metrics.stress_level,
        stress_level_status: stress_status(metrics.stress_level),
        mood: metrics.mood,
        relaxation_level: metrics.relaxation_level,
        fatigue_level: metrics.fatigue_level,
        recommendations: metrics.recommendations.clone(),
        respiratory_rate: vitals.respiratory_rate,
        respiratory_rate_status: respiratory_rate_status(vitals.respiratory_rate),
        heart_rate: vitals.heart_rate,
        heart_rate_status: heart_rate_status(vitals.heart_rate),
        oxygen_saturation: vitals.oxygen_saturation,
        oxygen_saturation_status: oxygen_saturation_status(vitals.oxygen_saturation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_calm_neutral_face() {
        let face = FaceAttributes {
            neutral: 90.0,
            happiness: 10.0,
            ..Default::default()
        };
        let metrics = derive_from_face(&face);

        // mean(0, 0, 0, 0, 10) = 2 -> ceil(0.2) = 1
        assert_eq!(metrics.stress_level, 1);
        assert_eq!(metrics.mood, ExpressionMood::Neutral);
        assert_eq!(metrics.relaxation_level, RelaxationLevel::High);
        // mean(4.5, 0, 0) * 2 = 3
        assert_eq!(metrics.fatigue_level, 3);
    }

    #[test]
    fn test_smiling_face_is_happy() {
        let face = FaceAttributes {
            neutral: 20.0,
            happiness: 30.0,
            smile: 80.0,
            ..Default::default()
        };
        assert_eq!(derive_from_face(&face).mood, ExpressionMood::Happy);
    }

    #[test]
    fn test_angry_face() {
        let face = FaceAttributes {
            anger: 90.0,
            fear: 40.0,
            sadness: 40.0,
            disgust: 30.0,
            neutral: 0.0,
            head_pitch: -27.0,
            ..Default::default()
        };
        let metrics = derive_from_face(&face);

        // mean(90, 40, 30, 40, 100) = 60 -> 6
        assert_eq!(metrics.stress_level, 6);
        assert_eq!(metrics.mood, ExpressionMood::Sad);
        assert_eq!(metrics.relaxation_level, RelaxationLevel::Moderate);
        // mean(5, 2, 3) * 2 = 6.67 -> 7
        assert_eq!(metrics.fatigue_level, 7);
    }

    #[test]
    fn test_no_faces_is_error() {
        assert_eq!(derive_from_first_face(&[]), Err(MetricsError::NoFaceDetected));
        assert_eq!(
            MetricsError::NoFaceDetected.to_string(),
            "No faces detected in the image"
        );
    }

    #[test]
    fn test_first_face_wins() {
        let calm = FaceAttributes {
            neutral: 100.0,
            ..Default::default()
        };
        let upset = FaceAttributes {
            sadness: 100.0,
            ..Default::default()
        };
        let metrics = derive_from_first_face(&[calm, upset]).unwrap();
        assert_eq!(metrics, derive_from_face(&calm));
    }

    #[rstest]
    #[case(1, ExpressionMood::Happy, RelaxationLevel::High, StressStatus::Low)]
    #[case(3, ExpressionMood::Happy, RelaxationLevel::High, StressStatus::Low)]
    #[case(4, ExpressionMood::Neutral, RelaxationLevel::Moderate, StressStatus::Moderate)]
    #[case(6, ExpressionMood::Neutral, RelaxationLevel::Moderate, StressStatus::Moderate)]
    #[case(7, ExpressionMood::Neutral, RelaxationLevel::Low, StressStatus::Moderate)]
    #[case(8, ExpressionMood::Sad, RelaxationLevel::Low, StressStatus::High)]
    #[case(10, ExpressionMood::Sad, RelaxationLevel::Low, StressStatus::High)]
    fn test_stress_based_defaults(
        #[case] stress: u8,
        #[case] mood: ExpressionMood,
        #[case] relaxation: RelaxationLevel,
        #[case] status: StressStatus,
    ) {
        assert_eq!(mood_from_stress(stress), mood);
        assert_eq!(relaxation_from_stress(stress), relaxation);
        assert_eq!(stress_status(stress), status);
    }

    #[test]
    fn test_recommendations_cover_each_tier_then_general() {
        let metrics = DerivedMetrics::from_stress_and_fatigue(8, 5);
        let recs = generate_recommendations(&metrics);

        assert_eq!(recs.len(), 7);
        assert!(recs[0].contains("high stress"));
        assert!(recs[1].contains("feeling down"));
        assert!(recs[2].contains("tension"));
        assert!(recs[3].contains("moderate signs of fatigue"));
        assert_eq!(recs[4], GENERAL_RECOMMENDATIONS[0]);
        assert_eq!(recs[6], GENERAL_RECOMMENDATIONS[2]);
    }

    #[test]
    fn test_record_gets_statuses() {
        let report = DerivedMetrics::from_stress_and_fatigue(5, 2).into_report();
        let vitals = VitalSigns {
            respiratory_rate: 16,
            heart_rate: 72,
            oxygen_saturation: 94,
        };
        let record = to_record(Uuid::new_v4(), Uuid::new_v4(), Utc::now(), &report, vitals);
        assert_eq!(record.stress_level_status, StressStatus::Moderate);
        assert_eq!(record.recommendations, report.recommendations);
        assert_eq!(record.respiratory_rate, 16);
        assert_eq!(record.respiratory_rate_status, VitalStatus::Normal);
        assert_eq!(record.heart_rate_status, VitalStatus::Normal);
        assert_eq!(record.oxygen_saturation_status, VitalStatus::Low);
    }

    #[rstest]
    #[case(0, VitalStatus::Low)]
    #[case(11, VitalStatus::Low)]
    #[case(12, VitalStatus::Normal)]
    #[case(20, VitalStatus::Normal)]
    #[case(21, VitalStatus::High)]
    fn test_respiratory_rate_status(#[case] rate: u8, #[case] expected: VitalStatus) {
        assert_eq!(respiratory_rate_status(rate), expected);
    }

    #[rstest]
    #[case(45, VitalStatus::Low)]
    #[case(59, VitalStatus::Low)]
    #[case(60, VitalStatus::Normal)]
    #[case(100, VitalStatus::Normal)]
    #[case(101, VitalStatus::High)]
    fn test_heart_rate_status(#[case] rate: u8, #[case] expected: VitalStatus) {
        assert_eq!(heart_rate_status(rate), expected);
    }

    #[rstest]
    #[case(88, VitalStatus::Low)]
    #[case(94, VitalStatus::Low)]
    #[case(95, VitalStatus::Normal)]
    #[case(100, VitalStatus::Normal)]
    fn test_oxygen_saturation_status(#[case] percent: u8, #[case] expected: VitalStatus) {
        assert_eq!(oxygen_saturation_status(percent), expected);
    }

    fn arb_face() -> impl Strategy<Value = FaceAttributes> {
        (
            (0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0),
            (0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0, -90.0f64..=90.0),
        )
            .prop_map(|((anger, disgust, fear, happiness), (neutral, sadness, smile, head_pitch))| {
                FaceAttributes {
                    anger,
                    disgust,
                    fear,
                    happiness,
                    neutral,
                    sadness,
                    smile,
                    head_pitch,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_levels_in_range(face in arb_face()) {
            let metrics = derive_from_face(&face);
            prop_assert!((MIN_LEVEL..=MAX_LEVEL).contains(&metrics.stress_level));
            prop_assert!((MIN_LEVEL..=MAX_LEVEL).contains(&metrics.fatigue_level));
            prop_assert_eq!(metrics.relaxation_level, relaxation_from_stress(metrics.stress_level));
        }

        #[test]
        fn prop_report_always_has_seven_recommendations(stress in 1u8..=10, fatigue in 1u8..=10) {
            let report = DerivedMetrics::from_stress_and_fatigue(stress, fatigue).into_report();
            prop_assert_eq!(report.recommendations.len(), 7);
        }

        #[test]
        fn prop_drawn_rates_read_normal(rate in RESPIRATORY_RATE_RANGE, pulse in HEART_RATE_RANGE) {
            prop_assert_eq!(respiratory_rate_status(rate), VitalStatus::Normal);
            prop_assert_eq!(heart_rate_status(pulse), VitalStatus::Normal);
        }
    }
}
