use std::collections::HashMap;

use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use dusys_core::AppError;
use dusys_models::FlashCategory;
use tracing::{info, instrument};

use crate::session::Session;
use crate::state::AppState;
use crate::validator::{FormErrors, ValidatedForm};

use super::model::{INVALID_LOGIN_MESSAGE, LoginForm, LoginTemplate};
use super::service::AuthService;

pub const LOGIN_PATH: &str = "/login/";

/// Render the login page, or log in with an auto-login token
#[instrument(skip_all)]
pub async fn login_page(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    mut session: Session,
) -> Result<Response, AppError> {
    let outcome = AuthService::auto_login(&state, &mut session, &params).await?;

    if outcome.redirects() || session.is_authenticated() {
        return redirect(&state, session, landing_path(&state)).await;
    }

    render_login(&state, session, None).await
}

/// Log in with a username and password, or with an auto-login token
#[instrument(skip_all)]
pub async fn login_submit(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    mut session: Session,
    form: Result<ValidatedForm<LoginForm>, FormErrors>,
) -> Result<Response, AppError> {
    let outcome = AuthService::auto_login(&state, &mut session, &params).await?;

    if outcome.redirects() || session.is_authenticated() {
        return redirect(&state, session, landing_path(&state)).await;
    }

    let form = match form {
        Ok(ValidatedForm(form)) => form,
        Err(FormErrors(message)) => {
            return render_login(&state, session, Some(message)).await;
        }
    };

    match AuthService::login_with_password(&state, &form).await? {
        Some(user) => {
            session.login(user.id, false);
            info!(user_id = %user.id, "User logged in");
            redirect(&state, session, landing_path(&state)).await
        }
        None => {
            session.flash(FlashCategory::Warning, INVALID_LOGIN_MESSAGE);
            redirect(&state, session, LOGIN_PATH).await
        }
    }
}

/// End the session
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, mut session: Session) -> Result<Response, AppError> {
    if let Some(user_id) = session.user_id() {
        info!(user_id = %user_id, "User logged out");
    }
    session.destroy();
    redirect(&state, session, LOGIN_PATH).await
}

fn landing_path(state: &AppState) -> &str {
    &state.settings.auth.auto_login.landing_path
}

async fn redirect(state: &AppState, session: Session, to: &str) -> Result<Response, AppError> {
    let jar = session.commit(state).await?;
    Ok((jar, Redirect::to(to)).into_response())
}

async fn render_login(
    state: &AppState,
    mut session: Session,
    form_error: Option<String>,
) -> Result<Response, AppError> {
    let app = &state.settings.app;
    let template = LoginTemplate {
        app_name: &app.app_name,
        app_icon: &app.app_icon,
        locale: &app.babel_default_locale,
        flashes: session.take_flashes(),
        form_error,
    };
    let html = template.render().map_err(AppError::internal)?;

    let jar = session.commit(state).await?;
    Ok((jar, Html(html)).into_response())
}
