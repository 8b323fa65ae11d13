use axum::Json;
use axum::extract::State;
use axum::response::Redirect;
use dusys_core::AppError;
use tracing::instrument;

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::model::LandingResponse;

/// Default view after login
#[instrument(skip_all, fields(user_id = %current.user.id))]
pub async fn landing(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<LandingResponse>, AppError> {
    let roles = state
        .identity
        .user_roles(current.user.id)
        .await?
        .into_iter()
        .map(|role| role.name)
        .collect();

    Ok(Json(LandingResponse {
        user: current.user,
        roles,
        company_id: current.company_id,
    }))
}

pub async fn index(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.settings.auth.auto_login.landing_path)
}
