// consent-backend/src/api/mod.rs

use crate::config::AppConfig;
use crate::logging::request_logging_middleware;
use crate::middleware::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::service::consent_log_service::ConsentLogService;
use crate::service::cookie_config_service::CookieConfigService;
use crate::utils::jwt::JwtManager;
use axum::http::HeaderValue;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod dto;
pub mod handlers;

use handlers::analytics_handler::admin_analytics_router;
use handlers::consent_log_handler::consent_log_router;
use handlers::cookie_config_handler::{admin_cookie_config_router, cookie_config_router};
use handlers::system_handler::system_router;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub cookie_config_service: Arc<CookieConfigService>,
    pub consent_log_service: Arc<ConsentLogService>,
    pub jwt_manager: Arc<JwtManager>,
    pub config: Arc<AppConfig>,
}

/// 全ルートを合成する
///
/// レート制限はAPIルートのみに適用し、/health は予算外に置く。
pub fn create_router(app_state: AppState, rate_limiter: RateLimiter) -> Router {
    let cors = build_cors_layer(&app_state.config);

    let api_routes = cookie_config_router(app_state.clone())
        .merge(consent_log_router(app_state.clone()))
        .merge(admin_cookie_config_router(app_state.clone()))
        .merge(admin_analytics_router(app_state.clone()))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    Router::new()
        .merge(api_routes)
        .merge(system_router())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(cors)
}

fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
