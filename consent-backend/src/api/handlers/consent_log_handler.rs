// consent-backend/src/api/handlers/consent_log_handler.rs

use crate::api::dto::consent_log_dto::{LogConsentDto, LogConsentResponse};
use crate::api::AppState;
use crate::error::AppResult;
use crate::types::ApiResponse;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};

/// 同意イベントを記録（公開エンドポイント）
///
/// IPとUser-Agentはリクエストメタデータからサーバー側で補完する。
pub async fn log_consent_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LogConsentDto>,
) -> AppResult<ApiResponse<LogConsentResponse>> {
    let ip_address = client_ip_from_headers(&headers);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let result = app_state
        .consent_log_service
        .log_consent(payload, ip_address, user_agent)
        .await?;

    Ok(ApiResponse::success(result))
}

/// リバースプロキシ配下を想定したクライアントIPの特定
fn client_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// --- Router Setup ---

pub fn consent_log_router(app_state: AppState) -> Router {
    Router::new()
        .route("/consent/log", post(log_consent_handler))
        .with_state(app_state)
}
