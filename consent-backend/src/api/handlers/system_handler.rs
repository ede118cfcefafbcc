// consent-backend/src/api/handlers/system_handler.rs

use crate::types::ApiResponse;
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
}

/// ヘルスチェック
///
/// 認証もレート制限も通さない（監視系からの定期アクセスを予算から除外する）。
pub async fn health_check_handler() -> ApiResponse<HealthResponse> {
    ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
    })
}

// --- Router Setup ---

pub fn system_router() -> Router {
    Router::new().route("/health", get(health_check_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_returns_ok() {
        let app = system_router();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
