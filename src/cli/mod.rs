//! Administrative commands behind the `dusys-cli` binary.

use dusys_auth::{AutoLoginClaims, TokenError, expiry_in, issue_token};
use dusys_config::{AuthConfig, ConfigError, Settings};
use dusys_core::{AppError, hash_password};
use dusys_models::{NewUser, Role, User};
use serde_json::Value;
use tracing::info;

use crate::identity::IdentityStore;

/// Makes sure the admin, auto-login and self-registration roles exist.
pub async fn init_roles(
    identity: &dyn IdentityStore,
    auth: &AuthConfig,
) -> Result<Vec<Role>, AppError> {
    let mut roles = Vec::new();
    for name in auth.builtin_roles() {
        let role = identity.ensure_role(&name).await?;
        info!(role = %role.name, "Role ready");
        roles.push(role);
    }
    Ok(roles)
}

pub struct AdminAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Creates an active user with a password and the admin role.
pub async fn create_admin(
    identity: &dyn IdentityStore,
    auth: &AuthConfig,
    account: AdminAccount,
) -> Result<User, AppError> {
    if account.password.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!("Password must not be empty")));
    }

    let role = identity.ensure_role(&auth.admin_role).await?;
    let password_hash = hash_password(&account.password)?;

    identity
        .add_user(NewUser {
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            role_id: role.id,
            password_hash: Some(password_hash),
            active: true,
        })
        .await
}

/// Parses a `company_id` given on the command line.
///
/// JSON literals (numbers, strings in quotes) keep their type; anything else
/// is taken as a plain string.
pub fn parse_company_id(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub struct TokenRequest {
    pub username: String,
    pub email: String,
    pub company_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Lifetime in seconds; `None` issues a token without `exp`.
    pub ttl_secs: Option<i64>,
}

/// Mints an auto-login token signed with the configured secret.
pub fn issue_auto_login_token(settings: &Settings, request: TokenRequest) -> Result<String, TokenError> {
    let claims = AutoLoginClaims {
        company_id: request.company_id.as_deref().map(parse_company_id),
        username: request.username,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        exp: request.ttl_secs.map(expiry_in),
    };
    issue_token(&claims, &settings.auth.auto_login.secret)
}

/// The effective configuration as TOML, secrets masked.
pub fn render_config(settings: &Settings) -> Result<String, ConfigError> {
    settings.redacted().to_toml()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryIdentityStore;
    use dusys_auth::TokenVerifier;
    use serde_json::json;

    #[tokio::test]
    async fn test_init_roles_creates_builtin_roles() {
        let store = MemoryIdentityStore::new();
        let auth = AuthConfig::default();

        let roles = init_roles(&store, &auth).await.unwrap();
        let again = init_roles(&store, &auth).await.unwrap();

        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Admin", "CompanyUser", "EmpresaCriador"]);
        assert_eq!(roles, again);
    }

    #[tokio::test]
    async fn test_create_admin_hashes_password() {
        let store = MemoryIdentityStore::new();
        let auth = AuthConfig::default();

        let user = create_admin(
            &store,
            &auth,
            AdminAccount {
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Admin".to_string(),
                password: "s3cret".to_string(),
            },
        )
        .await
        .unwrap();

        let hash = user.password_hash.as_deref().unwrap();
        assert_ne!(hash, "s3cret");
        assert!(dusys_core::verify_password("s3cret", hash).unwrap());

        let roles = store.user_roles(user.id).await.unwrap();
        assert_eq!(roles[0].name, "Admin");
    }

    #[test]
    fn test_parse_company_id_keeps_json_types() {
        assert_eq!(parse_company_id("42"), json!(42));
        assert_eq!(parse_company_id("\"42\""), json!("42"));
        assert_eq!(parse_company_id("acme"), json!("acme"));
    }

    #[test]
    fn test_issued_token_verifies() {
        let settings = Settings::default();
        let token = issue_auto_login_token(
            &settings,
            TokenRequest {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
                company_id: Some("7".to_string()),
                first_name: None,
                last_name: None,
                ttl_secs: Some(300),
            },
        )
        .unwrap();

        let claims = TokenVerifier::new(&settings.auth.auto_login.secret)
            .verify(&token)
            .unwrap();
        assert_eq!(claims.company_id, Some(json!(7)));
        assert!(claims.exp.is_some());
    }

    #[test]
    fn test_render_config_masks_secret() {
        let mut settings = Settings::default();
        settings.auth.auto_login.secret = "do-not-print".to_string();
        let rendered = render_config(&settings).unwrap();
        assert!(!rendered.contains("do-not-print"));
    }
}
