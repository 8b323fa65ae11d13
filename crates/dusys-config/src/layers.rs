//! Configuration layers and the merge contract.
//!
//! Layers are plain TOML tables. [`merge`] applies a later layer onto an
//! earlier one:
//!
//! - a table merges into a table recursively, key by key;
//! - any other value (string, integer, boolean, array) replaces the earlier
//!   value wholesale;
//! - keys absent from the later layer keep their earlier value.
//!
//! The environment layer only contains keys whose variables are set, so an
//! unset variable never clobbers a default.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::error::ConfigError;

/// Environment variable naming the override file.
pub const OVERRIDE_PATH_ENV: &str = "DUSYS_CONFIG_OVERRIDE";

/// Override file picked up from the working directory when
/// [`OVERRIDE_PATH_ENV`] is unset.
pub const DEFAULT_OVERRIDE_FILE: &str = "dusys_config_override.toml";

/// Where the override layer comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverrideSource {
    /// No override layer.
    None,
    /// Applied when the file exists, skipped silently otherwise.
    Optional(PathBuf),
    /// Must exist; a missing file is an error.
    Required(PathBuf),
}

impl OverrideSource {
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        match lookup(OVERRIDE_PATH_ENV) {
            Some(path) if !path.trim().is_empty() => Self::Required(PathBuf::from(path)),
            _ => Self::Optional(PathBuf::from(DEFAULT_OVERRIDE_FILE)),
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required(_))
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Str,
    Int,
    Bool,
    List,
}

/// Environment variable → settings path.
const ENV_BINDINGS: &[(&str, &[&str], Kind)] = &[
    ("DUSYS_BIND_ADDRESS", &["server", "bind_address"], Kind::Str),
    ("DATABASE_DIALECT", &["database", "primary", "dialect"], Kind::Str),
    ("DATABASE_USER", &["database", "primary", "user"], Kind::Str),
    ("DATABASE_PASSWORD", &["database", "primary", "password"], Kind::Str),
    ("DATABASE_HOST", &["database", "primary", "host"], Kind::Str),
    ("DATABASE_PORT", &["database", "primary", "port"], Kind::Int),
    ("DATABASE_DB", &["database", "primary", "name"], Kind::Str),
    // The examples database shares the primary dialect.
    ("DATABASE_DIALECT", &["database", "examples", "dialect"], Kind::Str),
    ("EXAMPLES_USER", &["database", "examples", "user"], Kind::Str),
    ("EXAMPLES_PASSWORD", &["database", "examples", "password"], Kind::Str),
    ("EXAMPLES_HOST", &["database", "examples", "host"], Kind::Str),
    ("EXAMPLES_PORT", &["database", "examples", "port"], Kind::Int),
    ("EXAMPLES_DB", &["database", "examples", "name"], Kind::Str),
    ("DATABASE_MAX_CONNECTIONS", &["database", "max_connections"], Kind::Int),
    ("REDIS_HOST", &["redis", "host"], Kind::Str),
    ("REDIS_PORT", &["redis", "port"], Kind::Int),
    ("REDIS_CELERY_DB", &["redis", "celery_db"], Kind::Int),
    ("REDIS_RESULTS_DB", &["redis", "results_db"], Kind::Int),
    ("REDIS_RESULTS_DB", &["cache", "redis_db"], Kind::Int),
    ("REDIS_RESULTS_DB", &["data_cache", "redis_db"], Kind::Int),
    ("AUTO_LOGIN_SECRET", &["auth", "auto_login", "secret"], Kind::Str),
    ("AUTO_LOGIN_ENABLED", &["auth", "auto_login", "enabled"], Kind::Bool),
    ("SESSION_BACKEND", &["session", "backend"], Kind::Str),
    ("SESSION_COOKIE_SECURE", &["session", "cookie_secure"], Kind::Bool),
    ("ALLOWED_ORIGINS", &["cors", "origins"], Kind::List),
    ("LOG_LEVEL", &["observability", "log_level"], Kind::Str),
    ("LOG_DIR", &["observability", "log_dir"], Kind::Str),
    ("OBSERVABILITY_ENABLED", &["observability", "enabled"], Kind::Bool),
    ("OTEL_EXPORTER_OTLP_ENDPOINT", &["observability", "otlp_endpoint"], Kind::Str),
    ("RATE_LIMIT_ENABLED", &["rate_limit", "enabled"], Kind::Bool),
    ("RATE_LIMIT_LOGIN_PER_SECOND", &["rate_limit", "login_per_second"], Kind::Int),
    ("RATE_LIMIT_LOGIN_BURST_SIZE", &["rate_limit", "login_burst_size"], Kind::Int),
];

/// Builds the environment layer from a variable lookup.
///
/// Only variables that are set appear in the returned table.
pub fn environment_layer(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Table, ConfigError> {
    let mut layer = Table::new();

    for (var, path, kind) in ENV_BINDINGS {
        let Some(raw) = lookup(var) else {
            continue;
        };
        let value = parse_env_value(var, &raw, *kind)?;
        insert_path(&mut layer, path, value);
    }

    Ok(layer)
}

fn parse_env_value(var: &str, raw: &str, kind: Kind) -> Result<Value, ConfigError> {
    let invalid = || ConfigError::InvalidEnv {
        var: var.to_string(),
        value: raw.to_string(),
    };

    match kind {
        Kind::Str => Ok(Value::String(raw.to_string())),
        Kind::Int => raw.trim().parse::<i64>().map(Value::Integer).map_err(|_| invalid()),
        Kind::Bool => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Value::Boolean(true)),
            "0" | "false" | "no" | "off" => Ok(Value::Boolean(false)),
            _ => Err(invalid()),
        },
        Kind::List => Ok(Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )),
    }
}

fn insert_path(table: &mut Table, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = table;
    for key in parents {
        let entry = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        let Value::Table(next) = entry else {
            return;
        };
        current = next;
    }

    current.insert(last.to_string(), value);
}

/// Applies `layer` on top of `base`.
pub fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Table(base), Value::Table(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

/// Reads an override file.
///
/// Returns `Ok(None)` when the file does not exist and `required` is false.
pub fn read_override_file(path: &Path, required: bool) -> Result<Option<Table>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let table = toml::from_str::<Table>(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(Some(table))
}
