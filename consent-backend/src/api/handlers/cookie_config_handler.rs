// consent-backend/src/api/handlers/cookie_config_handler.rs

use crate::api::dto::cookie_config_dto::{
    AvailableLanguageDto, CookieConfigResponse, UpsertCookieConfigDto,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::{jwt_auth_middleware, AuthMiddlewareState, AuthenticatedAdmin};
use crate::types::ApiResponse;
use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, put},
    Json, Router,
};

/// 言語別の設定を取得（公開エンドポイント）
pub async fn get_cookie_config_handler(
    State(app_state): State<AppState>,
    Path(language): Path<String>,
) -> AppResult<ApiResponse<CookieConfigResponse>> {
    let (config, source) = app_state
        .cookie_config_service
        .get_by_language(&language)
        .await?;

    let language = config.language.clone();
    Ok(ApiResponse::success_for_language(config, &language, source))
}

/// デフォルト言語の設定を取得
pub async fn get_default_cookie_config_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<CookieConfigResponse>> {
    let default_language = app_state.config.default_language.clone();
    let (config, source) = app_state
        .cookie_config_service
        .get_by_language(&default_language)
        .await?;

    let language = config.language.clone();
    Ok(ApiResponse::success_for_language(config, &language, source))
}

/// 利用可能な言語の一覧を取得
pub async fn get_available_languages_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AvailableLanguageDto>>> {
    let languages = app_state.cookie_config_service.get_available().await?;
    Ok(ApiResponse::success(languages))
}

/// すべての設定を取得（管理用、無効なドキュメントも含む）
pub async fn admin_list_cookie_configs_handler(
    State(app_state): State<AppState>,
    _admin: AuthenticatedAdmin,
) -> AppResult<ApiResponse<Vec<CookieConfigResponse>>> {
    let configs = app_state.cookie_config_service.list_all().await?;
    Ok(ApiResponse::success(configs))
}

/// 設定を作成または全上書き（editor / adminのみ）
pub async fn upsert_cookie_config_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedAdmin,
    Path(language): Path<String>,
    Json(payload): Json<UpsertCookieConfigDto>,
) -> AppResult<ApiResponse<CookieConfigResponse>> {
    admin.ensure_can_write()?;

    let saved = app_state
        .cookie_config_service
        .upsert(&language, payload, &admin.subject)
        .await?;

    Ok(ApiResponse::success(saved))
}

/// 設定を削除（editor / adminのみ）
pub async fn delete_cookie_config_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedAdmin,
    Path(language): Path<String>,
) -> AppResult<ApiResponse<()>> {
    admin.ensure_can_write()?;

    app_state.cookie_config_service.delete(&language).await?;

    Ok(ApiResponse::success(()))
}

// --- Router Setup ---

/// 公開ルート（認証不要）
pub fn cookie_config_router(app_state: AppState) -> Router {
    Router::new()
        .route("/cookie-config", get(get_default_cookie_config_handler))
        .route(
            "/cookie-config/languages",
            get(get_available_languages_handler),
        )
        .route("/cookie-config/{language}", get(get_cookie_config_handler))
        .with_state(app_state)
}

/// 管理ルート（JWT認証必須）
pub fn admin_cookie_config_router(app_state: AppState) -> Router {
    let auth_state = AuthMiddlewareState {
        jwt_manager: app_state.jwt_manager.clone(),
    };

    Router::new()
        .route(
            "/admin/cookie-config",
            get(admin_list_cookie_configs_handler),
        )
        .route(
            "/admin/cookie-config/{language}",
            put(upsert_cookie_config_handler).delete(delete_cookie_config_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            jwt_auth_middleware,
        ))
        .with_state(app_state)
}
