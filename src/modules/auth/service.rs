use std::collections::HashMap;

use axum::http::StatusCode;
use dusys_auth::LoginIdentity;
use dusys_config::AutoLoginConfig;
use dusys_core::{AppError, verify_password};
use dusys_models::{FlashCategory, NewUser, User};
use tracing::{info, instrument, warn};

use crate::identity::find_user_by_login;
use crate::metrics::{track_auto_login, track_login, track_user_created};
use crate::session::Session;
use crate::state::AppState;

use super::model::{AutoLoginOutcome, LoginForm};

pub struct AuthService;

impl AuthService {
    /// The auto-login token in `params`, if one was supplied.
    pub fn token_param<'a>(
        params: &'a HashMap<String, String>,
        config: &AutoLoginConfig,
    ) -> Option<&'a str> {
        params
            .get(&config.query_param)
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
    }

    /// Runs the token auto-login handler.
    ///
    /// A rejected token only queues a warning flash; the caller then carries
    /// on with the regular login flow. On success the token's `company_id` is
    /// stored in the session and the user (created on first sight) is logged
    /// in with "remember me".
    #[instrument(skip_all)]
    pub async fn auto_login(
        state: &AppState,
        session: &mut Session,
        params: &HashMap<String, String>,
    ) -> Result<AutoLoginOutcome, AppError> {
        let config = &state.settings.auth.auto_login;
        if !config.enabled {
            return Ok(AutoLoginOutcome::NoToken);
        }
        let Some(token) = Self::token_param(params, config) else {
            return Ok(AutoLoginOutcome::NoToken);
        };

        let claims = match state.token_verifier.verify(token) {
            Ok(claims) => claims,
            Err(err) => {
                warn!(reason = err.kind(), error = %err, "Auto-login token rejected");
                track_auto_login(err.kind());
                session.flash(FlashCategory::Warning, config.failure_message.clone());
                return Ok(AutoLoginOutcome::Rejected);
            }
        };

        let identity = claims.into_identity(config);
        session.set_company_id(identity.company_id.clone());

        let user = match state.identity.find_user_by_email(&identity.email).await? {
            Some(user) => user,
            None => Self::create_token_user(state, &identity).await?,
        };

        if !user.active {
            warn!(user_id = %user.id, "Auto-login for inactive user skipped");
            track_auto_login("inactive");
            return Ok(AutoLoginOutcome::Inactive(user));
        }

        session.login(user.id, true);
        info!(user_id = %user.id, company_id = ?identity.company_id, "Auto-login succeeded");
        track_auto_login("success");

        Ok(AutoLoginOutcome::LoggedIn(user))
    }

    #[instrument(skip(state, identity), fields(email = %identity.email))]
    async fn create_token_user(
        state: &AppState,
        identity: &LoginIdentity,
    ) -> Result<User, AppError> {
        let role_name = &state.settings.auth.auto_login.default_role;
        let role = state
            .identity
            .find_role(role_name)
            .await?
            .ok_or_else(|| AppError::internal_error(format!("Role '{}' does not exist", role_name)))?;

        let user = state
            .identity
            .add_user(NewUser {
                username: identity.username.clone(),
                email: identity.email.clone(),
                first_name: identity.first_name.clone(),
                last_name: identity.last_name.clone(),
                role_id: role.id,
                password_hash: None,
                active: true,
            })
            .await
            .map_err(|err| {
                // A taken username under a new email is a server-side failure here.
                if err.status == StatusCode::CONFLICT {
                    AppError::internal(err.error.context("Auto-login user could not be created"))
                } else {
                    err
                }
            })?;

        info!(user_id = %user.id, role = %role.name, "User created from auto-login token");
        track_user_created(&role.name);

        Ok(user)
    }

    /// Checks a username (or email) and password.
    ///
    /// Returns `None` for unknown, inactive or password-less users and for a
    /// wrong password. Login counters are only touched for active users.
    #[instrument(skip(state, form), fields(username = %form.username))]
    pub async fn login_with_password(
        state: &AppState,
        form: &LoginForm,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = find_user_by_login(state.identity.as_ref(), &form.username).await? else {
            info!("Login failed: unknown user");
            track_login("unknown_user");
            return Ok(None);
        };

        if !user.active {
            info!(user_id = %user.id, "Login failed: inactive user");
            track_login("inactive");
            return Ok(None);
        }

        let valid = match &user.password_hash {
            Some(hash) => verify_password(&form.password, hash)?,
            None => false,
        };

        state.identity.record_login(user.id, valid).await?;

        if !valid {
            info!(user_id = %user.id, "Login failed: wrong password");
            track_login("wrong_password");
            return Ok(None);
        }

        track_login("success");
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_param_ignores_blank_values() {
        let config = AutoLoginConfig::default();
        let mut params = HashMap::new();
        assert_eq!(AuthService::token_param(&params, &config), None);

        params.insert("jwt".to_string(), "  ".to_string());
        assert_eq!(AuthService::token_param(&params, &config), None);

        params.insert("jwt".to_string(), "abc.def.ghi".to_string());
        assert_eq!(AuthService::token_param(&params, &config), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_param_uses_configured_name() {
        let config = AutoLoginConfig {
            query_param: "token".to_string(),
            ..AutoLoginConfig::default()
        };
        let params = HashMap::from([("jwt".to_string(), "abc".to_string())]);
        assert_eq!(AuthService::token_param(&params, &config), None);
    }
}
