// consent-backend/src/api/handlers/analytics_handler.rs

use crate::api::dto::analytics_dto::{
    AnalyticsQueryDto, ComplianceStatusResponse, ConsentAnalyticsResponse,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::{jwt_auth_middleware, AuthMiddlewareState, AuthenticatedAdmin};
use crate::types::ApiResponse;
use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Router,
};

/// 同意ログの二段集計（言語×アクション）
pub async fn consent_analytics_handler(
    State(app_state): State<AppState>,
    _admin: AuthenticatedAdmin,
    Query(query): Query<AnalyticsQueryDto>,
) -> AppResult<ApiResponse<ConsentAnalyticsResponse>> {
    let result = app_state.consent_log_service.analytics(query).await?;
    Ok(ApiResponse::success(result))
}

/// コンプライアンス状況（プレースホルダーポリシー）
pub async fn compliance_status_handler(
    State(app_state): State<AppState>,
    _admin: AuthenticatedAdmin,
    Query(query): Query<AnalyticsQueryDto>,
) -> AppResult<ApiResponse<ComplianceStatusResponse>> {
    let result = app_state
        .consent_log_service
        .compliance_status(query)
        .await?;
    Ok(ApiResponse::success(result))
}

// --- Router Setup ---

/// 集計ルート（JWT認証必須、閲覧のみなのでviewerも可）
pub fn admin_analytics_router(app_state: AppState) -> Router {
    let auth_state = AuthMiddlewareState {
        jwt_manager: app_state.jwt_manager.clone(),
    };

    Router::new()
        .route("/admin/analytics/consent", get(consent_analytics_handler))
        .route(
            "/admin/analytics/consent/compliance",
            get(compliance_status_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            jwt_auth_middleware,
        ))
        .with_state(app_state)
}
