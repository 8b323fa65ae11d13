use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use dusys_models::User;
use serde_json::Value;
use tracing::debug;

use crate::modules::auth::controller::LOGIN_PATH;
use crate::session::Session;
use crate::state::AppState;

/// Extractor for the logged-in, active user behind the session cookie.
///
/// Anonymous requests, sessions whose user has disappeared and deactivated
/// users are redirected to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Tenant asserted by the last auto-login token, if any.
    pub company_id: Option<Value>,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let Some(user_id) = session.user_id() else {
            return Err(Redirect::to(LOGIN_PATH).into_response());
        };

        let user = state
            .identity
            .find_user_by_id(user_id)
            .await
            .map_err(IntoResponse::into_response)?;

        match user {
            Some(user) if user.active => Ok(CurrentUser {
                user,
                company_id: session.company_id().cloned(),
            }),
            _ => {
                debug!(user_id = %user_id, "Session user is missing or inactive");
                Err(Redirect::to(LOGIN_PATH).into_response())
            }
        }
    }
}
