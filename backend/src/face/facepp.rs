//! Face++ detect API client

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use wellness_shared::image_metrics::{derive_from_first_face, DerivedMetrics, FaceAttributes};

use super::{FaceAnalysisError, FaceAnalyzer, ImageInput};
use crate::config::FaceAnalysisConfig;

const DETECT_PATH: &str = "/facepp/v3/detect";
const RETURN_ATTRIBUTES: &str = "emotion,age,gender,smiling,headpose";

#[derive(Debug, Default, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    faces: Vec<DetectedFace>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DetectedFace {
    #[serde(default)]
    attributes: Attributes,
}

#[derive(Debug, Default, Deserialize)]
struct Attributes {
    #[serde(default)]
    emotion: Emotion,
    #[serde(default)]
    smile: Option<Smile>,
    #[serde(default)]
    headpose: Option<HeadPose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Emotion {
    anger: f64,
    disgust: f64,
    fear: f64,
    happiness: f64,
    neutral: f64,
    sadness: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Smile {
    value: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HeadPose {
    pitch_angle: f64,
}

impl From<&DetectedFace> for FaceAttributes {
    fn from(face: &DetectedFace) -> Self {
        let attrs = &face.attributes;
        FaceAttributes {
            anger: attrs.emotion.anger,
            disgust: attrs.emotion.disgust,
            fear: attrs.emotion.fear,
            happiness: attrs.emotion.happiness,
            neutral: attrs.emotion.neutral,
            sadness: attrs.emotion.sadness,
            smile: attrs.smile.as_ref().map(|s| s.value).unwrap_or(0.0),
            head_pitch: attrs.headpose.as_ref().map(|h| h.pitch_angle).unwrap_or(0.0),
        }
    }
}

/// Client for the Face++ detect endpoint
#[derive(Clone, Debug)]
pub struct FacePlusPlusAnalyzer {
    base_url: String,
    api_key: SecretString,
    api_secret: SecretString,
    client: reqwest::Client,
}

impl FacePlusPlusAnalyzer {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        api_secret: SecretString,
        timeout: Duration,
    ) -> Result<Self, FaceAnalysisError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            api_secret,
            client,
        })
    }

    pub fn from_config(config: &FaceAnalysisConfig) -> Result<Self, FaceAnalysisError> {
        let secret = |v: &Option<String>| SecretString::new(v.clone().unwrap_or_default());
        Self::new(
            &config.base_url,
            secret(&config.api_key),
            secret(&config.api_secret),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn form(&self, image: &ImageInput) -> Form {
        let form = Form::new()
            .text("api_key", self.api_key.expose_secret().clone())
            .text("api_secret", self.api_secret.expose_secret().clone())
            .text("return_attributes", RETURN_ATTRIBUTES);

        match image {
            ImageInput::Bytes(bytes) => {
                form.part("image_file", Part::bytes(bytes.clone()).file_name("image.jpg"))
            }
            ImageInput::Url(url) => form.text("image_url", url.clone()),
        }
    }

    async fn detect(&self, image: &ImageInput) -> Result<DetectResponse, FaceAnalysisError> {
        let url = format!("{}{}", self.base_url, DETECT_PATH);
        let resp = self.client.post(&url).multipart(self.form(image)).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        let parsed: Option<DetectResponse> = serde_json::from_str(&body).ok();

        if let Some(message) = parsed.as_ref().and_then(|p| p.error_message.clone()) {
            return Err(FaceAnalysisError::Upstream(message));
        }
        if !status.is_success() {
            let snippet: String = body.chars().take(256).collect();
            return Err(FaceAnalysisError::Upstream(format!("status {}: {}", status.as_u16(), snippet)));
        }

        parsed.ok_or_else(|| FaceAnalysisError::Upstream("malformed detect response".to_string()))
    }
}

#[async_trait]
impl FaceAnalyzer for FacePlusPlusAnalyzer {
    fn provider(&self) -> &'static str {
        "facepp"
    }

    async fn analyze(&self, image: &ImageInput) -> Result<DerivedMetrics, FaceAnalysisError> {
        let response = self.detect(image).await.map_err(|e| {
            warn!(error = %e, "Face++ detection failed");
            e
        })?;

        debug!(faces = response.faces.len(), "Face++ detection complete");

        let faces: Vec<FaceAttributes> = response.faces.iter().map(FaceAttributes::from).collect();
        Ok(derive_from_first_face(&faces)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attributes_default_to_zero() {
        let response: DetectResponse =
            serde_json::from_str(r#"{"faces":[{"face_token":"t"}]}"#).unwrap();
        let face = FaceAttributes::from(&response.faces[0]);
        assert_eq!(face, FaceAttributes::default());
    }

    #[test]
    fn test_attributes_are_mapped() {
        let response: DetectResponse = serde_json::from_str(
            r#"{
                "faces": [{
                    "attributes": {
                        "emotion": {"anger": 1.5, "sadness": 40.0, "neutral": 20.0, "surprise": 3.0},
                        "smile": {"value": 12.0, "threshold": 50.0},
                        "headpose": {"pitch_angle": -18.0, "yaw_angle": 2.0}
                    }
                }]
            }"#,
        )
        .unwrap();

        let face = FaceAttributes::from(&response.faces[0]);
        assert_eq!(face.anger, 1.5);
        assert_eq!(face.sadness, 40.0);
        assert_eq!(face.smile, 12.0);
        assert_eq!(face.head_pitch, -18.0);
    }
}
