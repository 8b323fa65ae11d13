//! HTTP server and session settings.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8088".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Redis,
    Memory,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// Lifetime of a non-persistent session, in seconds.
    pub lifetime_secs: u64,
    /// Lifetime of a "remember me" session, in seconds.
    pub remember_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Redis,
            cookie_name: "session".to_string(),
            cookie_secure: false,
            lifetime_secs: 31 * 24 * 60 * 60,
            remember_secs: 365 * 24 * 60 * 60,
        }
    }
}

impl SessionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.cookie_name.is_empty() {
            return Err(ConfigError::Invalid(
                "session.cookie_name must not be empty".to_string(),
            ));
        }
        if self.lifetime_secs == 0 || self.remember_secs == 0 {
            return Err(ConfigError::Invalid(
                "session lifetimes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
