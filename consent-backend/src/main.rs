// consent-backend/src/main.rs
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod db;
mod domain;
mod error;
mod logging;
mod middleware;
mod repository;
mod service;
mod types;
mod utils;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::db::create_db_pool;
use crate::middleware::rate_limit::RateLimiter;
use crate::repository::consent_log_repository::ConsentLogRepository;
use crate::repository::cookie_config_repository::CookieConfigRepository;
use crate::service::config_cache_service::ConfigCacheService;
use crate::service::consent_log_service::ConsentLogService;
use crate::service::cookie_config_service::CookieConfigService;
use crate::utils::jwt::{JwtConfig, JwtManager};
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "consent_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting consent configuration service...");

    // 設定を読み込む
    let app_config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        environment = %app_config.environment,
        cache_enabled = app_config.cache.enabled,
        "Configuration loaded"
    );

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created successfully.");

    // マイグレーションを適用
    Migrator::up(&db_pool, None)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied.");

    // リポジトリとサービスを構築（キャッシュとリミッタは明示的に注入する）
    let config_repository = Arc::new(CookieConfigRepository::new(db_pool.clone()));
    let log_repository = Arc::new(ConsentLogRepository::new(db_pool.clone()));
    let cache = Arc::new(ConfigCacheService::new(
        app_config.cache.ttl_seconds,
        app_config.cache.enabled,
    ));

    let cookie_config_service = Arc::new(CookieConfigService::new(config_repository, cache));
    let consent_log_service = Arc::new(ConsentLogService::new(log_repository));

    let jwt_manager = Arc::new(
        JwtManager::new(JwtConfig::new(app_config.jwt_secret.clone()))
            .expect("Invalid JWT configuration"),
    );

    let rate_limiter = RateLimiter::new(&app_config.rate_limit);

    let server_addr = app_config.server_addr();
    let app_state = AppState {
        cookie_config_service,
        consent_log_service,
        jwt_manager,
        config: Arc::new(app_config),
    };

    // ルーターの設定
    let app_router = create_router(app_state, rate_limiter);

    // サーバーの起動
    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
