//! Logging and tracing settings.
//!
//! # Environment Variables
//!
//! - `LOG_LEVEL`: level for this service's own targets (default: `info`)
//! - `LOG_DIR`: directory for rolling log files (default: `storage/logs`)
//! - `OBSERVABILITY_ENABLED`: file logs, OTLP export and Prometheus metrics (default: `false`)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP collector (default: `http://localhost:4317`)

use serde::{Deserialize, Serialize};

/// Logging and tracing settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub enabled: bool,
    pub log_level: String,
    pub log_dir: String,
    pub otlp_endpoint: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_level: "info".to_string(),
            log_dir: "storage/logs".to_string(),
            otlp_endpoint: "http://localhost:4317".to_string(),
        }
    }
}
