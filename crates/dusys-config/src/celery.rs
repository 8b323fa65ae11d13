//! Background task queue settings.
//!
//! The gateway does not run workers; it assembles and validates the
//! settings handed to them. Broker and result-backend URLs derive from the
//! [`RedisConfig`] unless set explicitly.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::RedisConfig;
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CeleryConfig {
    pub broker_url: Option<String>,
    pub result_backend: Option<String>,
    pub imports: Vec<String>,
    pub worker_prefetch_multiplier: u32,
    pub task_acks_late: bool,
    pub beat_schedule: BTreeMap<String, BeatEntry>,
}

impl Default for CeleryConfig {
    fn default() -> Self {
        let mut beat_schedule = BTreeMap::new();
        beat_schedule.insert(
            "reports.scheduler".to_string(),
            BeatEntry {
                task: "reports.scheduler".to_string(),
                schedule: Crontab::default(),
            },
        );
        beat_schedule.insert(
            "reports.prune_log".to_string(),
            BeatEntry {
                task: "reports.prune_log".to_string(),
                schedule: Crontab {
                    minute: "10".to_string(),
                    hour: "0".to_string(),
                    ..Crontab::default()
                },
            },
        );

        Self {
            broker_url: None,
            result_backend: None,
            imports: [
                "superset.sql_lab",
                "superset.tasks.scheduler",
                "superset.tasks.thumbnails",
                "superset.tasks.cache",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            worker_prefetch_multiplier: 1,
            task_acks_late: false,
            beat_schedule,
        }
    }
}

impl CeleryConfig {
    pub fn broker_url(&self, redis: &RedisConfig) -> String {
        self.broker_url
            .clone()
            .unwrap_or_else(|| redis.url(redis.celery_db))
    }

    pub fn result_backend(&self, redis: &RedisConfig) -> String {
        self.result_backend
            .clone()
            .unwrap_or_else(|| redis.url(redis.results_db))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (name, entry) in &self.beat_schedule {
            entry.schedule.to_schedule().map_err(|e| {
                ConfigError::Invalid(format!("beat schedule {:?}: {}", name, e))
            })?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeatEntry {
    pub task: String,
    pub schedule: Crontab,
}

/// Crontab fields in task-queue order. Every field defaults to `*`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crontab {
    pub minute: String,
    pub hour: String,
    pub day_of_week: String,
    pub day_of_month: String,
    pub month_of_year: String,
}

impl Default for Crontab {
    fn default() -> Self {
        Self {
            minute: "*".to_string(),
            hour: "*".to_string(),
            day_of_week: "*".to_string(),
            day_of_month: "*".to_string(),
            month_of_year: "*".to_string(),
        }
    }
}

impl Crontab {
    /// Six-field expression (seconds first) understood by the `cron` crate.
    pub fn expression(&self) -> String {
        format!(
            "0 {} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month_of_year, self.day_of_week
        )
    }

    pub fn to_schedule(&self) -> Result<cron::Schedule, cron::error::Error> {
        cron::Schedule::from_str(&self.expression())
    }
}
