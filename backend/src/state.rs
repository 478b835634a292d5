//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state
//! extraction. Built once at startup and read-only afterwards.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::face::{analyzer_from_config, FaceAnalyzer, SimulatedAnalyzer};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Shared application state
///
/// - `db`: PgPool is internally Arc'd, cloning is O(1)
/// - `config`, `analyzer`: wrapped in Arc
/// - `jwt`: pre-computed keys wrapped in Arc
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Face analyzer selected by configuration
    pub analyzer: Arc<dyn FaceAnalyzer>,
    /// Prometheus render handle, absent when no recorder was installed
    pub metrics: Option<PrometheusHandle>,
    pub started_at: Instant,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the JWT keys and builds the face analyzer, so call it once
    /// at startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);

        let analyzer = analyzer_from_config(&config.face_analysis).unwrap_or_else(|e| {
            warn!(error = %e, "Face analyzer setup failed, using simulated analysis");
            Arc::new(SimulatedAnalyzer) as Arc<dyn FaceAnalyzer>
        });

        Self {
            db,
            config: Arc::new(config),
            jwt,
            analyzer,
            metrics: None,
            started_at: Instant::now(),
        }
    }

    /// Replace the analyzer, used by tests to point at a mock server
    pub fn with_analyzer(mut self, analyzer: Arc<dyn FaceAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn analyzer(&self) -> &dyn FaceAnalyzer {
        self.analyzer.as_ref()
    }

    /// Seconds since startup
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
