//! Image analysis service
//!
//! Turns a submitted photo into [`ImageHealthMetrics`] through the configured
//! [`FaceAnalyzer`] and keeps a history of the results.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use wellness_shared::image_metrics::{
    to_record, HEART_RATE_RANGE, OXYGEN_SATURATION_RANGE, RESPIRATORY_RATE_RANGE,
};
use wellness_shared::{HealthDataRecord, ImageHealthMetrics, VitalSigns};

use crate::error::AnalysisError;
use crate::face::{FaceAnalyzer, ImageInput};
use crate::repositories::{HealthDataRepository, HISTORY_LIMIT};

/// Maximum accepted image size in bytes
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Interpret a JSON `image` string
///
/// Accepts an http(s) URL, a `data:` URL or bare base64.
pub fn parse_image_source(image: &str) -> Result<ImageInput, AnalysisError> {
    let image = image.trim();
    if image.is_empty() {
        return Err(AnalysisError::NoImage);
    }

    if image.starts_with("http://") || image.starts_with("https://") {
        return Ok(ImageInput::Url(image.to_string()));
    }

    let encoded = match image.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| AnalysisError::InvalidImage("malformed data URL".to_string()))?,
        None => image,
    };

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| AnalysisError::InvalidImage(format!("not valid base64: {}", e)))?;

    image_bytes(bytes)
}

/// Wrap uploaded bytes, enforcing the size limit
pub fn image_bytes(bytes: Vec<u8>) -> Result<ImageInput, AnalysisError> {
    if bytes.is_empty() {
        return Err(AnalysisError::NoImage);
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AnalysisError::InvalidImage(
            "image exceeds the 5 MB limit".to_string(),
        ));
    }
    Ok(ImageInput::Bytes(bytes))
}

/// Base64 form stored when the caller asks to keep the image
pub fn raw_image_data(image: &ImageInput) -> String {
    match image {
        ImageInput::Bytes(bytes) => STANDARD.encode(bytes),
        ImageInput::Url(url) => url.clone(),
    }
}

/// Vitals stored alongside each analysis; no provider measures them
pub fn simulated_vitals() -> VitalSigns {
    let mut rng = rand::thread_rng();
    VitalSigns {
        respiratory_rate: rng.gen_range(RESPIRATORY_RATE_RANGE),
        heart_rate: rng.gen_range(HEART_RATE_RANGE),
        oxygen_saturation: rng.gen_range(OXYGEN_SATURATION_RANGE),
    }
}

pub struct AnalysisService;

impl AnalysisService {
    /// Analyse one image for `user_id` and store the result
    pub async fn analyze(
        pool: &PgPool,
        analyzer: &dyn FaceAnalyzer,
        user_id: Uuid,
        image: ImageInput,
        save_image: bool,
    ) -> Result<ImageHealthMetrics, AnalysisError> {
        let provider = analyzer.provider();

        let derived = match analyzer.analyze(&image).await {
            Ok(derived) => derived,
            Err(e) => {
                metrics::counter!("image_analyses_total", "provider" => provider, "outcome" => "error")
                    .increment(1);
                warn!(provider, error = %e, "Face analysis failed");
                return Err(e.into());
            }
        };

        let report = derived.into_report();
        let record = to_record(Uuid::new_v4(), user_id, Utc::now(), &report, simulated_vitals());
        let raw = save_image.then(|| raw_image_data(&image));

        HealthDataRepository::create(pool, &record, raw.as_deref())
            .await
            .map_err(AnalysisError::Storage)?;

        metrics::counter!("image_analyses_total", "provider" => provider, "outcome" => "ok")
            .increment(1);
        info!(
            user_id = %user_id,
            provider,
            stress_level = report.stress_level,
            fatigue_level = report.fatigue_level,
            "Image analysed"
        );

        Ok(report)
    }

    /// Most recent analyses, newest first
    pub async fn history(pool: &PgPool, user_id: Uuid) -> Result<Vec<HealthDataRecord>, AnalysisError> {
        HealthDataRepository::list_recent(pool, user_id, HISTORY_LIMIT)
            .await
            .and_then(|rows| rows.into_iter().map(HealthDataRecord::try_from).collect())
            .map_err(AnalysisError::History)
    }
}
