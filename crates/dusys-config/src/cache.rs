//! Redis and cache backend settings.
//!
//! # Environment Variables
//!
//! - `REDIS_HOST`: Redis host (default: `redis`)
//! - `REDIS_PORT`: Redis port (default: `6379`)
//! - `REDIS_CELERY_DB`: database index for the task broker (default: `0`)
//! - `REDIS_RESULTS_DB`: database index for task results and caches (default: `1`)

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub celery_db: u32,
    pub results_db: u32,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "redis".to_string(),
            port: 6379,
            celery_db: 0,
            results_db: 1,
        }
    }
}

impl RedisConfig {
    pub fn url(&self, db: u32) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, db)
    }
}

/// A cache backend as seen by the host framework.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub cache_type: String,
    /// Default entry lifetime in seconds.
    pub default_timeout: u64,
    pub key_prefix: String,
    pub redis_db: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: "RedisCache".to_string(),
            default_timeout: 300,
            key_prefix: "superset_".to_string(),
            redis_db: 1,
        }
    }
}

impl CacheConfig {
    pub fn redis_url(&self, redis: &RedisConfig) -> String {
        redis.url(self.redis_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_points_at_results_db() {
        let redis = RedisConfig::default();
        let cache = CacheConfig::default();
        assert_eq!(cache.redis_url(&redis), "redis://redis:6379/1");
    }
}
