//! Per-browser session state.
//!
//! The session is a small JSON document stored server-side and referenced by
//! an opaque cookie. It records who is logged in, the tenant (`company_id`)
//! asserted by the last auto-login token, and flash messages waiting to be
//! shown on the next rendered page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::UserId;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Info,
    Warning,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Set when the login happened in this browser session rather than
    /// being restored from a remembered one.
    #[serde(default)]
    pub fresh: bool,
    #[serde(default)]
    pub remember: bool,
    #[serde(default)]
    pub company_id: Option<Value>,
    #[serde(default)]
    pub flashes: Vec<FlashMessage>,
}

impl SessionData {
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn login(&mut self, user_id: UserId, remember: bool) {
        self.user_id = Some(user_id);
        self.fresh = true;
        self.remember = remember;
    }

    pub fn flash(&mut self, category: FlashCategory, message: impl Into<String>) {
        self.flashes.push(FlashMessage {
            category,
            message: message.into(),
        });
    }

    /// Removes and returns the queued flash messages.
    pub fn take_flashes(&mut self) -> Vec<FlashMessage> {
        std::mem::take(&mut self.flashes)
    }

    /// True when there is nothing worth persisting.
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.company_id.is_none() && self.flashes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_marks_fresh_and_remember() {
        let mut session = SessionData::default();
        let user_id = UserId::new();

        session.login(user_id, true);

        assert!(session.is_authenticated());
        assert!(session.fresh);
        assert!(session.remember);
        assert_eq!(session.user_id, Some(user_id));
    }

    #[test]
    fn test_flashes_are_drained() {
        let mut session = SessionData::default();
        session.flash(FlashCategory::Warning, "careful");

        let flashes = session.take_flashes();

        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].category.as_str(), "warning");
        assert!(session.take_flashes().is_empty());
        assert!(session.is_empty());
    }

    #[test]
    fn test_company_id_serializes_under_its_key() {
        let session = SessionData {
            company_id: Some(json!(12)),
            ..SessionData::default()
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["company_id"], json!(12));
        assert!(!session.is_empty());
    }
}
