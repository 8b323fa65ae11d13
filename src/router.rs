use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::auth::router::init_auth_router;
use crate::modules::landing::router::init_landing_router;
use crate::state::AppState;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use dusys_config::CorsConfig;
use serde_json::{Value, json};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

pub fn init_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(init_auth_router(&state))
        .merge(init_landing_router(&state))
        .route("/health", get(health))
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state.clone())
        .layer(middleware::from_fn(logging_middleware));

    for (name, value) in &state.settings.app.http_headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                router = router.layer(SetResponseHeaderLayer::if_not_present(name, value));
            }
            _ => warn!(header = %name, "Skipping invalid configured response header"),
        }
    }

    if state.settings.cors.enabled {
        router = router.layer(cors_layer(&state.settings.cors));
    }

    router
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let methods: Vec<Method> = config
        .methods
        .iter()
        .filter_map(|method| method.parse().ok())
        .collect();

    // Wildcards cannot be combined with credentials, so mirror the request.
    let origins = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let headers = if config.allows_any_header() {
        AllowHeaders::mirror_request()
    } else {
        let headers: Vec<HeaderName> = config
            .allow_headers
            .iter()
            .filter_map(|header| header.parse().ok())
            .collect();
        AllowHeaders::list(headers)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.supports_credentials)
}
