//! Database connection settings.
//!
//! Two data sources are configured: the primary metadata database and the
//! examples database. Each is described by its parts and composed into a
//! connection URI on demand, so overriding a single part (say, the host)
//! is enough to retarget it.
//!
//! # Environment Variables
//!
//! - `DATABASE_DIALECT`: URI scheme shared by both sources (default: `postgresql`)
//! - `DATABASE_USER`, `DATABASE_PASSWORD`, `DATABASE_HOST`, `DATABASE_PORT`, `DATABASE_DB`
//! - `EXAMPLES_USER`, `EXAMPLES_PASSWORD`, `EXAMPLES_HOST`, `EXAMPLES_PORT`, `EXAMPLES_DB`
//! - `DATABASE_MAX_CONNECTIONS`: pool size for the primary database (default: `10`)

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub primary: DatabaseConfig,
    pub examples: DatabaseConfig,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            primary: DatabaseConfig::default(),
            examples: DatabaseConfig {
                user: "examples".to_string(),
                password: "examples".to_string(),
                name: "examples".to_string(),
                ..DatabaseConfig::default()
            },
            max_connections: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full URI; takes precedence over the individual parts when set.
    pub uri: Option<String>,
    pub dialect: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            dialect: "postgresql".to_string(),
            user: "superset".to_string(),
            password: "superset".to_string(),
            host: "db".to_string(),
            port: 5432,
            name: "superset".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// `{dialect}://{user}:{password}@{host}:{port}/{name}`
    pub fn connection_uri(&self) -> String {
        if let Some(uri) = &self.uri {
            return uri.clone();
        }
        format!(
            "{}://{}:{}@{}:{}/{}",
            self.dialect, self.user, self.password, self.host, self.port, self.name
        )
    }

    pub(crate) fn redact(&mut self, mask: &str) {
        self.password = mask.to_string();
        if self.uri.is_some() {
            self.uri = Some(mask.to_string());
        }
    }
}
