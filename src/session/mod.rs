//! Server-side sessions.
//!
//! The browser only holds an opaque random identifier in a cookie; the
//! [`SessionData`] it refers to lives in a [`SessionStore`]. Handlers take a
//! [`Session`] extractor, mutate it, and call [`Session::commit`] to persist
//! the changes and obtain the cookie jar to return with the response.
//! Nothing is written (and no cookie is set) unless the session changed.

pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dusys_config::SessionConfig;
use dusys_core::AppError;
use dusys_models::{FlashCategory, FlashMessage, SessionData, UserId};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

pub use self::memory::MemorySessionStore;
pub use self::redis::RedisSessionStore;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, AppError>;

    async fn save(&self, id: &str, data: &SessionData, ttl: Duration) -> Result<(), AppError>;

    async fn destroy(&self, id: &str) -> Result<(), AppError>;
}

/// New session identifier with 244 bits of randomness.
fn generate_session_id() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// The current request's session.
#[derive(Debug)]
pub struct Session {
    jar: CookieJar,
    id: Option<String>,
    data: SessionData,
    dirty: bool,
    rotate: bool,
    destroyed: bool,
}

impl Session {
    pub fn user_id(&self) -> Option<UserId> {
        self.data.user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_authenticated()
    }

    pub fn company_id(&self) -> Option<&Value> {
        self.data.company_id.as_ref()
    }

    pub fn set_company_id(&mut self, company_id: Option<Value>) {
        self.data.company_id = company_id;
        self.dirty = true;
    }

    /// Marks the session as logged in as `user_id`.
    ///
    /// The identifier is replaced on commit so a pre-login id cannot be
    /// reused.
    pub fn login(&mut self, user_id: UserId, remember: bool) {
        self.data.login(user_id, remember);
        self.dirty = true;
        self.rotate = true;
    }

    pub fn flash(&mut self, category: FlashCategory, message: impl Into<String>) {
        self.data.flash(category, message);
        self.dirty = true;
    }

    /// Drains queued flash messages.
    pub fn take_flashes(&mut self) -> Vec<FlashMessage> {
        let flashes = self.data.take_flashes();
        if !flashes.is_empty() {
            self.dirty = true;
        }
        flashes
    }

    /// Forgets everything and removes the cookie on commit.
    pub fn destroy(&mut self) {
        self.data = SessionData::default();
        self.dirty = true;
        self.destroyed = true;
    }

    /// Persists pending changes and returns the cookie jar for the response.
    pub async fn commit(mut self, state: &AppState) -> Result<CookieJar, AppError> {
        if !self.dirty {
            return Ok(self.jar);
        }

        let config = &state.settings.session;
        let store = state.sessions.as_ref();

        if self.destroyed || self.data.is_empty() {
            if let Some(id) = self.id.take() {
                store.destroy(&id).await?;
            }
            debug!("Session cleared");
            return Ok(self.jar.remove(removal_cookie(config)));
        }

        if self.rotate {
            if let Some(old) = self.id.take() {
                store.destroy(&old).await?;
            }
        }
        let id = self.id.unwrap_or_else(generate_session_id);

        let ttl = if self.data.remember {
            config.remember_secs
        } else {
            config.lifetime_secs
        };
        store
            .save(&id, &self.data, Duration::from_secs(ttl))
            .await?;

        Ok(self.jar.add(session_cookie(config, id, self.data.remember)))
    }
}

fn session_cookie(config: &SessionConfig, id: String, remember: bool) -> Cookie<'static> {
    let builder = Cookie::build((config.cookie_name.clone(), id))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax);

    if remember {
        let max_age = i64::try_from(config.remember_secs).unwrap_or(i64::MAX);
        builder.max_age(time::Duration::seconds(max_age)).build()
    } else {
        builder.build()
    }
}

fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), "")).path("/").build()
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie_id = jar
            .get(&state.settings.session.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());

        let (id, data) = match cookie_id {
            Some(id) => match state.sessions.load(&id).await? {
                Some(data) => (Some(id), data),
                None => {
                    debug!("Unknown or expired session cookie");
                    (None, SessionData::default())
                }
            },
            None => (None, SessionData::default()),
        };

        Ok(Session {
            jar,
            id,
            data,
            dirty: false,
            rotate: false,
            destroyed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique_and_long() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_remember_cookie_has_max_age() {
        let config = SessionConfig::default();

        let remembered = session_cookie(&config, "abc".to_string(), true);
        let transient = session_cookie(&config, "abc".to_string(), false);

        assert_eq!(
            remembered.max_age(),
            Some(time::Duration::seconds(config.remember_secs as i64))
        );
        assert_eq!(transient.max_age(), None);
        assert_eq!(remembered.http_only(), Some(true));
        assert_eq!(remembered.path(), Some("/"));
    }
}
