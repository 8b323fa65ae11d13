use dusys_models::{FlashMessage, User};
use serde::Deserialize;
use validator::Validate;

/// Flash shown when a username/password attempt fails.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid login. Please try again.";

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Result of running the auto-login handler on a request.
#[derive(Debug)]
pub enum AutoLoginOutcome {
    /// No token was supplied, or auto-login is disabled.
    NoToken,
    /// The token failed verification; a warning has been flashed.
    Rejected,
    LoggedIn(User),
    /// The token was valid but the account is deactivated, so no login
    /// happened.
    Inactive(User),
}

impl AutoLoginOutcome {
    /// Whether the request should be sent to the landing view.
    pub fn redirects(&self) -> bool {
        matches!(self, Self::LoggedIn(_) | Self::Inactive(_))
    }
}

#[derive(askama::Template)]
#[template(path = "login.html")]
pub struct LoginTemplate<'a> {
    pub app_name: &'a str,
    pub app_icon: &'a str,
    pub locale: &'a str,
    pub flashes: Vec<FlashMessage>,
    pub form_error: Option<String>,
}
