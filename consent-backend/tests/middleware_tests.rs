// consent-backend/tests/middleware_tests.rs
//
// DB不要のルーターレベルテスト（レート制限・認証・ヘルスチェック）

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use consent_backend::api::handlers::system_handler::system_router;
use consent_backend::config::RateLimitConfig;
use consent_backend::error::AppResult;
use consent_backend::middleware::auth::{
    jwt_auth_middleware, AuthMiddlewareState, AuthenticatedAdmin,
};
use consent_backend::middleware::rate_limit::{rate_limit_middleware, RateLimiter};
use consent_backend::utils::jwt::{AdminRole, JwtConfig, JwtManager};

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(uri: &str, ip: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).header("x-forwarded-for", ip);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

// --- レート制限 ---

fn rate_limited_app(max_requests: usize) -> Router {
    let limiter = RateLimiter::new(&RateLimitConfig {
        window_seconds: 900,
        max_requests,
    });

    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .layer(from_fn_with_state(limiter, rate_limit_middleware))
        .merge(system_router())
}

#[tokio::test]
async fn test_request_over_budget_receives_429_with_retry_after() {
    let app = rate_limited_app(2);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request("/ping", "10.0.0.1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(request("/ping", "10.0.0.1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["retryAfter"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_rate_limit_is_per_client_ip() {
    let app = rate_limited_app(1);

    let first = app
        .clone()
        .oneshot(request("/ping", "10.0.0.1", None))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // 別IPは別予算
    let other = app
        .clone()
        .oneshot(request("/ping", "10.0.0.2", None))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);

    let exhausted = app
        .clone()
        .oneshot(request("/ping", "10.0.0.1", None))
        .await
        .unwrap();
    assert_eq!(exhausted.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_check_exempt_from_rate_limit() {
    let app = rate_limited_app(1);

    // APIの予算を使い切る
    let _ = app
        .clone()
        .oneshot(request("/ping", "10.0.0.1", None))
        .await
        .unwrap();
    let exhausted = app
        .clone()
        .oneshot(request("/ping", "10.0.0.1", None))
        .await
        .unwrap();
    assert_eq!(exhausted.status(), StatusCode::TOO_MANY_REQUESTS);

    // /health は予算外
    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(request("/health", "10.0.0.1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

// --- JWT認証 ---

async fn protected_read_handler(_admin: AuthenticatedAdmin) -> AppResult<&'static str> {
    Ok("read ok")
}

async fn protected_write_handler(admin: AuthenticatedAdmin) -> AppResult<&'static str> {
    admin.ensure_can_write()?;
    Ok("write ok")
}

fn auth_app() -> (Router, JwtManager) {
    let jwt_manager = JwtManager::new(JwtConfig::default()).unwrap();
    let auth_state = AuthMiddlewareState {
        jwt_manager: Arc::new(jwt_manager.clone()),
    };

    let app = Router::new()
        .route("/admin/read", get(protected_read_handler))
        .route("/admin/write", get(protected_write_handler))
        .route_layer(from_fn_with_state(auth_state, jwt_auth_middleware));

    (app, jwt_manager)
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, _) = auth_app();

    let response = app
        .oneshot(request("/admin/read", "10.0.0.1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let (app, _) = auth_app();

    let response = app
        .oneshot(request("/admin/read", "10.0.0.1", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_viewer_can_read_but_not_write() {
    let (app, jwt_manager) = auth_app();
    let token = jwt_manager
        .generate_token("viewer-1", AdminRole::Viewer, 15)
        .unwrap();

    let read = app
        .clone()
        .oneshot(request("/admin/read", "10.0.0.1", Some(&token)))
        .await
        .unwrap();
    assert_eq!(read.status(), StatusCode::OK);

    let write = app
        .oneshot(request("/admin/write", "10.0.0.1", Some(&token)))
        .await
        .unwrap();
    assert_eq!(write.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_editor_can_write() {
    let (app, jwt_manager) = auth_app();
    let token = jwt_manager
        .generate_token("editor-1", AdminRole::Editor, 15)
        .unwrap();

    let response = app
        .oneshot(request("/admin/write", "10.0.0.1", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
