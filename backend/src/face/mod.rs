//! Facial-expression analysis
//!
//! [`FaceAnalyzer`] turns an image into [`DerivedMetrics`]. Two
//! implementations exist: a Face++ detection client and a simulator that
//! draws random levels. The one used is chosen from configuration at
//! startup.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use wellness_shared::image_metrics::DerivedMetrics;
use wellness_shared::MetricsError;

use crate::config::{FaceAnalysisConfig, FaceProvider};

mod facepp;
mod simulated;

pub use facepp::FacePlusPlusAnalyzer;
pub use simulated::SimulatedAnalyzer;

/// Image to analyse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Decoded image bytes
    Bytes(Vec<u8>),
    /// Publicly reachable http(s) URL
    Url(String),
}

#[derive(Error, Debug)]
pub enum FaceAnalysisError {
    #[error("Face++ API error: {0}")]
    Upstream(String),

    #[error("Face++ request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

#[async_trait]
pub trait FaceAnalyzer: Send + Sync + 'static {
    /// Label used in logs and metrics
    fn provider(&self) -> &'static str;

    async fn analyze(&self, image: &ImageInput) -> Result<DerivedMetrics, FaceAnalysisError>;
}

/// Build the analyzer selected by configuration
///
/// Face++ without both credentials falls back to the simulator.
pub fn analyzer_from_config(config: &FaceAnalysisConfig) -> anyhow::Result<Arc<dyn FaceAnalyzer>> {
    match config.provider {
        FaceProvider::Facepp if config.has_credentials() => {
            let analyzer = FacePlusPlusAnalyzer::from_config(config)?;
            Ok(Arc::new(analyzer))
        }
        FaceProvider::Facepp => {
            warn!("Face++ credentials missing, using simulated face analysis");
            Ok(Arc::new(SimulatedAnalyzer))
        }
        FaceProvider::Simulated => Ok(Arc::new(SimulatedAnalyzer)),
    }
}
