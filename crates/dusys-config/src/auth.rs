//! Authentication settings.
//!
//! Only database authentication is served; the other host-framework
//! authentication types are recognized so that an override file naming
//! them fails loudly instead of being ignored.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const PLACEHOLDER_SECRET: &str = "change-me-auto-login-secret";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    Oid,
    #[default]
    Db,
    Ldap,
    RemoteUser,
    Oauth,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub auth_type: AuthType,
    /// Allow self-registration through the host framework.
    pub user_registration: bool,
    /// Role granted to self-registered users.
    pub user_registration_role: String,
    /// Role granted to administrators created from the CLI.
    pub admin_role: String,
    pub auto_login: AutoLoginConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_type: AuthType::Db,
            user_registration: true,
            user_registration_role: "EmpresaCriador".to_string(),
            admin_role: "Admin".to_string(),
            auto_login: AutoLoginConfig::default(),
        }
    }
}

impl AuthConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.auth_type != AuthType::Db {
            return Err(ConfigError::Invalid(format!(
                "auth_type {:?} is not supported; only database authentication is served",
                self.auth_type
            )));
        }
        self.auto_login.validate()
    }

    /// Roles the `init` command makes sure exist.
    pub fn builtin_roles(&self) -> Vec<String> {
        let mut roles = vec![
            self.admin_role.clone(),
            self.auto_login.default_role.clone(),
            self.user_registration_role.clone(),
        ];
        roles.dedup();
        roles
    }
}

/// Signed-token auto-login on the login endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoLoginConfig {
    pub enabled: bool,
    /// Query parameter carrying the token.
    pub query_param: String,
    /// Shared HS256 secret.
    pub secret: String,
    /// Role given to users created from a token.
    pub default_role: String,
    pub default_first_name: String,
    pub default_last_name: String,
    /// Where a successful auto-login lands.
    pub landing_path: String,
    /// Flash shown when a token is rejected.
    pub failure_message: String,
}

impl Default for AutoLoginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            query_param: "jwt".to_string(),
            secret: PLACEHOLDER_SECRET.to_string(),
            default_role: "CompanyUser".to_string(),
            default_first_name: "Dusys".to_string(),
            default_last_name: "Viewer".to_string(),
            landing_path: "/tablemodelview/list/".to_string(),
            failure_message: "Ocorreu um erro ao realizar o login automático!".to_string(),
        }
    }
}

impl AutoLoginConfig {
    pub fn uses_placeholder_secret(&self) -> bool {
        self.enabled && self.secret == PLACEHOLDER_SECRET
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.secret.is_empty() {
            return Err(ConfigError::Invalid(
                "auth.auto_login.secret must not be empty".to_string(),
            ));
        }
        if !self.landing_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "auth.auto_login.landing_path must be an absolute path, got {:?}",
                self.landing_path
            )));
        }
        if self.query_param.is_empty() {
            return Err(ConfigError::Invalid(
                "auth.auto_login.query_param must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
