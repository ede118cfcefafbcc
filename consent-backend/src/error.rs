// consent-backend/src/error.rs

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Too many requests")]
    TooManyRequests { retry_after_seconds: u64 },

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::DbErr(db_err) => {
                // サーバーログには詳細を出すが、クライアントには返さない
                tracing::error!(error = ?db_err, "Database error");

                let status = match db_err {
                    DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match status {
                    StatusCode::NOT_FOUND => "The requested resource was not found",
                    _ => "A database error occurred",
                };

                (status, ErrorResponse::new(message))
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::new(&message)),
            AppError::ValidationError(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(&message))
            }
            AppError::ValidationErrors(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details("Validation failed", errors),
            ),
            AppError::ValidationFailure(errors) => {
                // validator のフィールドエラーを "field: message" 形式に変換
                let details: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            let message = e
                                .message
                                .as_ref()
                                .map_or_else(|| "Invalid value".to_string(), |m| m.to_string());
                            format!("{}: {}", field, message)
                        })
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Validation failed", details),
                )
            }
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(&message))
            }
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::new(&message))
            }
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, ErrorResponse::new(&message)),
            AppError::TooManyRequests {
                retry_after_seconds,
            } => {
                let response = ErrorResponse::with_retry_after(
                    "Rate limit exceeded. Please try again later.",
                    retry_after_seconds,
                );
                // Retry-After ヘッダーも付与する
                let mut res =
                    (StatusCode::TOO_MANY_REQUESTS, Json(response)).into_response();
                if let Ok(value) = retry_after_seconds.to_string().parse() {
                    res.headers_mut().insert(header::RETRY_AFTER, value);
                }
                return res;
            }
            AppError::InternalServerError(message) => {
                tracing::error!(detail = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An internal server error occurred"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            details: None,
            retry_after: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_details(error: &str, details: Vec<String>) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            details: Some(details),
            retry_after: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_retry_after(error: &str, retry_after_seconds: u64) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            details: None,
            retry_after: Some(retry_after_seconds),
            timestamp: Utc::now(),
        }
    }
}
