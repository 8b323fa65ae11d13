mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{TestApp, build_app, test_settings};

async fn rate_limited_app(burst: u32) -> TestApp {
    let mut settings = test_settings();
    settings.rate_limit.enabled = true;
    settings.rate_limit.login_per_second = 60;
    settings.rate_limit.login_burst_size = burst;
    build_app(settings, true).await
}

fn request_from(uri: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_login_is_rate_limited_per_client() {
    let app = rate_limited_app(2).await;

    for _ in 0..2 {
        let response = app.send(request_from("/login/", "203.0.113.7")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let limited = app.send(request_from("/login/", "203.0.113.7")).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

    let other_client = app.send(request_from("/login/", "198.51.100.1")).await;
    assert_eq!(other_client.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_other_routes_are_not_limited() {
    let app = rate_limited_app(1).await;

    for _ in 0..3 {
        let response = app.send(request_from("/health", "203.0.113.7")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
