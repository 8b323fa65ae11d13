use axum::{Router, routing::get};
use tower_governor::GovernorLayer;

use crate::state::AppState;

use super::controller::{LOGIN_PATH, login_page, login_submit, logout};

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let login = Router::new().route(LOGIN_PATH, get(login_page).post(login_submit));

    let login = match &state.login_governor {
        Some(config) => login.layer(GovernorLayer::new(config.clone())),
        None => login,
    };

    login.route("/logout/", get(logout))
}
