//! Wellness Tracker Shared Library
//!
//! This crate contains the domain model and the pure calculations
//! (scoring, trends, insight rules, image metric mapping) used by the
//! backend. Nothing in here performs I/O.

pub mod errors;
pub mod image_metrics;
pub mod insights;
pub mod models;
pub mod scoring;
pub mod trends;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use scoring::{calculate_health_score, rolling_health_score};
pub use trends::{build_trends, HealthTrends, TrendPoint};
