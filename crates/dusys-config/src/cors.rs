//! CORS policy.
//!
//! # Environment Variables
//!
//! - `ALLOWED_ORIGINS`: comma-separated origin list (default: `*`)

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub supports_credentials: bool,
    pub allow_headers: Vec<String>,
    pub methods: Vec<String>,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            supports_credentials: true,
            allow_headers: vec!["*".to_string()],
            methods: ["GET", "POST", "OPTIONS", "PUT", "DELETE"]
                .into_iter()
                .map(String::from)
                .collect(),
            origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.origins.iter().any(|origin| origin == "*")
    }

    pub fn allows_any_header(&self) -> bool {
        self.allow_headers.iter().any(|header| header == "*")
    }
}
