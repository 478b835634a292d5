//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod health_data;
pub mod health_log;
pub mod insight;
pub mod user;

pub use health_data::{HealthDataRepository, HealthDataRow, HISTORY_LIMIT};
pub use health_log::{CreatedHealthLog, HealthLogRecord, HealthLogRepository};
pub use insight::{InsightRecord, InsightRepository};
pub use user::{UserRecord, UserRepository};
