//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the face analyzer.

pub mod analysis;
pub mod health_log;
pub mod insights;
pub mod user;

pub use analysis::AnalysisService;
pub use health_log::HealthLogService;
pub use insights::InsightService;
pub use user::UserService;
