//! Error types for the wellness domain

use thiserror::Error;

/// Failures while turning face-detection output into health metrics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("No faces detected in the image")]
    NoFaceDetected,
}

/// Validation failure tied to a specific input field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{display_label}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            display_label: crate::validation::get_field_display_label(field).to_string(),
        }
    }
}
