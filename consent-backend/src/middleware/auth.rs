// consent-backend/src/middleware/auth.rs

use crate::error::AppError;
use crate::utils::jwt::{AdminRole, JwtManager};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;
use tracing::warn;

/// JWT認証ミドルウェアの設定
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub jwt_manager: Arc<JwtManager>,
}

/// 認証済み管理ユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub subject: String,
    pub role: AdminRole,
}

impl AuthenticatedAdmin {
    /// 書き込み権限（editor / admin）をチェック
    pub fn ensure_can_write(&self) -> Result<(), AppError> {
        if self.role.can_write() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Write access requires editor or admin role".to_string(),
            ))
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAdmin>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// JWT認証ミドルウェア（管理ルート用）
pub async fn jwt_auth_middleware(
    State(state): State<AuthMiddlewareState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    // Bearerトークンを抽出
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        warn!(path = %path, "Missing authentication token");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    // JWTを検証
    let claims = state
        .jwt_manager
        .verify_access_token(bearer.token())
        .map_err(|e| {
            warn!(path = %path, error = %e, "Invalid access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    request.extensions_mut().insert(AuthenticatedAdmin {
        subject: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_cannot_write() {
        let viewer = AuthenticatedAdmin {
            subject: "viewer-1".to_string(),
            role: AdminRole::Viewer,
        };
        assert!(viewer.ensure_can_write().is_err());

        let editor = AuthenticatedAdmin {
            subject: "editor-1".to_string(),
            role: AdminRole::Editor,
        };
        assert!(editor.ensure_can_write().is_ok());
    }
}
