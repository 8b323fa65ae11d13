use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{index, landing};

pub fn init_landing_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route(&state.settings.auth.auto_login.landing_path, get(landing))
}
