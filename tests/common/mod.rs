#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use dusys::cli::{AdminAccount, create_admin, init_roles};
use dusys::identity::MemoryIdentityStore;
use dusys::router::init_router;
use dusys::session::MemorySessionStore;
use dusys::state::AppState;
use dusys_config::{SessionBackend, Settings};
use dusys_models::User;
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const LANDING: &str = "/tablemodelview/list/";
pub const AUTO_LOGIN_WARNING: &str = "Ocorreu um erro ao realizar o login automático!";

pub struct TestApp {
    pub router: Router,
    pub identity: Arc<MemoryIdentityStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub settings: Settings,
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.auto_login.secret = SECRET.to_string();
    settings.session.backend = SessionBackend::Memory;
    settings.rate_limit.enabled = false;
    settings
}

/// App with the built-in roles seeded and rate limiting off.
pub async fn test_app() -> TestApp {
    build_app(test_settings(), true).await
}

pub async fn build_app(settings: Settings, seed_roles: bool) -> TestApp {
    let identity = Arc::new(MemoryIdentityStore::new());
    if seed_roles {
        init_roles(identity.as_ref(), &settings.auth).await.unwrap();
    }
    let sessions = Arc::new(MemorySessionStore::new());

    let state = AppState::new(settings.clone(), identity.clone(), sessions.clone()).unwrap();

    TestApp {
        router: init_router(state),
        identity,
        sessions,
        settings,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn create_password_user(&self, username: &str, email: &str, password: &str) -> User {
        create_admin(
            self.identity.as_ref(),
            &self.settings.auth,
            AdminAccount {
                username: username.to_string(),
                email: email.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                password: password.to_string(),
            },
        )
        .await
        .unwrap()
    }
}

/// Signs `claims` with the test secret.
pub fn token(claims: Value) -> String {
    token_with_secret(claims, SECRET)
}

pub fn token_with_secret(claims: Value, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// The `name=value` pair of the session cookie set by `response`, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    set_cookie(response)
        .and_then(|cookie| cookie.split(';').next().map(str::to_string))
        .filter(|pair| !pair.ends_with('='))
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
