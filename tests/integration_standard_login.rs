mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{LANDING, body_json, body_string, session_cookie, set_cookie, test_app};
use dusys::identity::IdentityStore;

#[tokio::test]
async fn test_login_with_username_and_password() {
    let app = test_app().await;
    let user = app.create_password_user("admin", "admin@example.com", "s3cret").await;

    let response = app.post_form("/login/", "username=admin&password=s3cret", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), Some(LANDING));
    let raw_cookie = set_cookie(&response).unwrap();
    assert!(!raw_cookie.contains("Max-Age"));

    let stored = app.identity.find_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.login_count, 1);
    assert!(stored.last_login.is_some());

    let cookie = session_cookie(&response).unwrap();
    let landing = app.get(LANDING, Some(&cookie)).await;
    assert_eq!(landing.status(), StatusCode::OK);
    let body = body_json(landing).await;
    assert_eq!(body["user"]["username"], "admin");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["company_id"].is_null());
}

#[tokio::test]
async fn test_login_with_email_falls_back() {
    let app = test_app().await;
    app.create_password_user("admin", "admin@example.com", "s3cret").await;

    let response = app
        .post_form("/login/", "username=admin%40example.com&password=s3cret", None)
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), Some(LANDING));
}

#[tokio::test]
async fn test_wrong_password_flashes_and_counts_failure() {
    let app = test_app().await;
    let user = app.create_password_user("admin", "admin@example.com", "s3cret").await;

    let response = app.post_form("/login/", "username=admin&password=nope", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), Some("/login/"));
    let stored = app.identity.find_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.fail_login_count, 1);
    assert_eq!(stored.login_count, 0);

    let cookie = session_cookie(&response).unwrap();
    let page = app.get("/login/", Some(&cookie)).await;
    assert_eq!(page.status(), StatusCode::OK);
    let body = body_string(page).await;
    assert!(body.contains("Invalid login. Please try again."));

    // Flashes are shown once.
    let again = body_string(app.get("/login/", Some(&cookie)).await).await;
    assert!(!again.contains("Invalid login. Please try again."));
}

#[tokio::test]
async fn test_unknown_user_is_rejected() {
    let app = test_app().await;

    let response = app.post_form("/login/", "username=ghost&password=x", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), Some("/login/"));
}

#[tokio::test]
async fn test_token_user_cannot_use_password_login() {
    let app = test_app().await;
    let jwt = common::token(serde_json::json!({ "username": "ana", "email": "ana@example.com" }));
    app.get(&format!("/login/?jwt={}", jwt), None).await;

    let response = app.post_form("/login/", "username=ana&password=anything", None).await;

    assert_eq!(common::location(&response), Some("/login/"));
}

#[tokio::test]
async fn test_empty_form_rerenders_page() {
    let app = test_app().await;

    let response = app.post_form("/login/", "username=&password=", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Username is required"));
    assert!(body.contains("Password is required"));
}

#[tokio::test]
async fn test_authenticated_login_page_redirects() {
    let app = test_app().await;
    app.create_password_user("admin", "admin@example.com", "s3cret").await;
    let login = app.post_form("/login/", "username=admin&password=s3cret", None).await;
    let cookie = session_cookie(&login).unwrap();

    let response = app.get("/login/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), Some(LANDING));
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let app = test_app().await;
    app.create_password_user("admin", "admin@example.com", "s3cret").await;
    let login = app.post_form("/login/", "username=admin&password=s3cret", None).await;
    let cookie = session_cookie(&login).unwrap();

    let response = app.get("/logout/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), Some("/login/"));
    assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    assert!(app.sessions.is_empty().await);

    let landing = app.get(LANDING, Some(&cookie)).await;
    assert_eq!(landing.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&landing), Some("/login/"));
}

#[tokio::test]
async fn test_landing_requires_login() {
    let app = test_app().await;

    let response = app.get(LANDING, None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), Some("/login/"));
}

#[tokio::test]
async fn test_index_redirects_to_landing() {
    let app = test_app().await;

    let response = app.get("/", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), Some(LANDING));
}

#[tokio::test]
async fn test_health_and_configured_headers() {
    let app = test_app().await;

    let response = app.get("/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-frame-options").unwrap(),
        "ALLOWALL"
    );
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cors_preflight_mirrors_origin_with_credentials() {
    let app = test_app().await;

    let response = app
        .send(
            Request::builder()
                .method("OPTIONS")
                .uri("/login/")
                .header(header::ORIGIN, "https://bi.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://bi.example.com"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
