//! # Dusys Config
//!
//! Process-wide configuration for the Dusys gateway.
//!
//! All settings live in one immutable [`Settings`] value that is assembled
//! once at start-up and then shared read-only. It is built from three
//! layers, each applied key-by-key on top of the previous one:
//!
//! 1. built-in defaults ([`Settings::default`])
//! 2. environment variables ([`layers::environment_layer`])
//! 3. an optional TOML override file ([`layers::read_override_file`])
//!
//! Tables merge recursively; scalars and arrays from a later layer replace
//! the earlier value. See [`layers`] for the exact contract.
//!
//! # Example
//!
//! ```ignore
//! use dusys_config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("{}", settings.database.primary.connection_uri());
//! ```

pub mod app;
pub mod auth;
pub mod cache;
pub mod celery;
pub mod cors;
pub mod database;
pub mod error;
pub mod features;
pub mod layers;
pub mod observability;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use app::{AppConfig, Language};
pub use auth::{AuthConfig, AuthType, AutoLoginConfig};
pub use cache::{CacheConfig, RedisConfig};
pub use celery::{BeatEntry, CeleryConfig, Crontab};
pub use cors::CorsConfig;
pub use database::{DatabaseConfig, DatabaseSettings};
pub use error::ConfigError;
pub use features::FeatureFlags;
pub use layers::{OVERRIDE_PATH_ENV, OverrideSource};
pub use observability::ObservabilityConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{ServerConfig, SessionBackend, SessionConfig};

const REDACTED: &str = "********";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub database: DatabaseSettings,
    pub redis: RedisConfig,
    pub cache: CacheConfig,
    pub data_cache: CacheConfig,
    pub celery: CeleryConfig,
    pub cors: CorsConfig,
    pub feature_flags: FeatureFlags,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Loads settings from the process environment and the optional
    /// override file.
    ///
    /// The override file path comes from `DUSYS_CONFIG_OVERRIDE`. When that
    /// variable is unset, `dusys_config_override.toml` in the working
    /// directory is used if it exists.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();
        let source = OverrideSource::from_lookup(&lookup);
        Self::load_with(&lookup, source)
    }

    /// Loads settings from an explicit environment lookup and override source.
    pub fn load_with(
        lookup: &dyn Fn(&str) -> Option<String>,
        source: OverrideSource,
    ) -> Result<Self, ConfigError> {
        let env = layers::environment_layer(lookup)?;

        let overrides = match &source {
            OverrideSource::None => None,
            OverrideSource::Optional(path) | OverrideSource::Required(path) => {
                let table = layers::read_override_file(path, source.is_required())?;
                match &table {
                    Some(_) => info!(path = %path.display(), "Loaded override configuration"),
                    None => info!("Using default configuration"),
                }
                table
            }
        };

        Self::from_layers(env, overrides)
    }

    /// Merges the environment layer and the override layer on top of the
    /// built-in defaults, then validates the result.
    pub fn from_layers(
        env: toml::Table,
        overrides: Option<toml::Table>,
    ) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::try_from(Settings::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        layers::merge(&mut merged, toml::Value::Table(env));
        if let Some(overrides) = overrides {
            layers::merge(&mut merged, toml::Value::Table(overrides));
        }

        let settings: Settings = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Invalid(e.to_string()))?;

        settings.validate()?;

        if settings.auth.auto_login.uses_placeholder_secret() {
            warn!("AUTO_LOGIN_SECRET is not set; auto-login tokens are verified with a placeholder secret");
        }

        Ok(settings)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()?;
        self.celery.validate()?;
        self.session.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }

    /// Returns a copy with passwords and secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.database.primary.redact(REDACTED);
        copy.database.examples.redact(REDACTED);
        copy.auth.auto_login.secret = REDACTED.to_string();
        copy
    }

    /// Renders the settings as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
