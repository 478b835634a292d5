use async_trait::async_trait;
use rand::Rng;
use wellness_shared::image_metrics::{DerivedMetrics, MAX_LEVEL, MIN_LEVEL};

use super::{FaceAnalysisError, FaceAnalyzer, ImageInput};

/// Draws stress and fatigue uniformly from 1-10 and ignores the image
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAnalyzer;

impl SimulatedAnalyzer {
    fn draw() -> DerivedMetrics {
        let mut rng = rand::thread_rng();
        let stress = rng.gen_range(MIN_LEVEL..=MAX_LEVEL);
        let fatigue = rng.gen_range(MIN_LEVEL..=MAX_LEVEL);
        DerivedMetrics::from_stress_and_fatigue(stress, fatigue)
    }
}

#[async_trait]
impl FaceAnalyzer for SimulatedAnalyzer {
    fn provider(&self) -> &'static str {
        "simulated"
    }

    async fn analyze(&self, _image: &ImageInput) -> Result<DerivedMetrics, FaceAnalysisError> {
        Ok(Self::draw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_shared::image_metrics::{mood_from_stress, relaxation_from_stress};

    #[tokio::test]
    async fn test_simulated_levels_are_consistent() {
        let analyzer = SimulatedAnalyzer;
        for _ in 0..50 {
            let metrics = analyzer.analyze(&ImageInput::Bytes(vec![1, 2, 3])).await.unwrap();
            assert!((1..=10).contains(&metrics.stress_level));
            assert!((1..=10).contains(&metrics.fatigue_level));
            assert_eq!(metrics.mood, mood_from_stress(metrics.stress_level));
            assert_eq!(metrics.relaxation_level, relaxation_from_stress(metrics.stress_level));
        }
    }
}
