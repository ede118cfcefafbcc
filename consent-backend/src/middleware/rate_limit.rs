// consent-backend/src/middleware/rate_limit.rs

use crate::config::RateLimitConfig;
use crate::error::AppError;
use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

/// クライアントIPごとの固定ウィンドウ状態
#[derive(Clone, Debug)]
struct WindowState {
    count: usize,
    window_start: Instant,
}

/// 固定ウィンドウ方式のレートリミッタ
///
/// プロセス内共有メモリのみで同期する。複数インスタンス構成では正しくない
/// （既知の制限）。グローバル変数ではなく明示的に構築してミドルウェアに渡す。
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, WindowState>>>,
    window: Duration,
    max_requests: usize,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            window: Duration::from_secs(config.window_seconds),
            max_requests: config.max_requests,
        }
    }

    /// 予算内ならカウントを進め、超過なら retry-after 秒数を返す
    pub async fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        let mut buckets = self.buckets.lock().await;

        let state = buckets.entry(key.to_string()).or_insert(WindowState {
            count: 0,
            window_start: now,
        });

        // ウィンドウが終了している場合はリセット
        if now.duration_since(state.window_start) >= self.window {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= self.max_requests {
            let elapsed = now.duration_since(state.window_start);
            let remaining = self.window.saturating_sub(elapsed);
            return Err(remaining.as_secs().max(1));
        }

        state.count += 1;
        Ok(())
    }
}

/// レート制限ミドルウェア
///
/// ヘルスチェックはこのミドルウェアを通さないルートに置くことで予算から除外する。
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let client_ip = extract_client_ip(&request);

    if let Err(retry_after_seconds) = limiter.check(&client_ip).await {
        return Err(AppError::TooManyRequests {
            retry_after_seconds,
        });
    }

    Ok(next.run(request).await)
}

/// クライアントIPの特定
///
/// リバースプロキシ配下を想定してX-Forwarded-Forの先頭を優先する。
pub(crate) fn extract_client_ip(request: &Request<Body>) -> String {
    let headers = request.headers();

    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
    {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: usize, window_seconds: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window_seconds,
            max_requests,
        })
    }

    #[tokio::test]
    async fn test_budget_boundary() {
        let limiter = limiter(100, 900);
        let now = Instant::now();

        // 100リクエスト目までは許可
        for _ in 0..100 {
            assert!(limiter.check_at("10.0.0.1", now).await.is_ok());
        }

        // 101リクエスト目で429相当、retry-afterヒント付き
        let retry_after = limiter.check_at("10.0.0.1", now).await.unwrap_err();
        assert!(retry_after >= 1);
        assert!(retry_after <= 900);
    }

    #[tokio::test]
    async fn test_window_reset() {
        let limiter = limiter(2, 60);
        let start = Instant::now();

        assert!(limiter.check_at("10.0.0.1", start).await.is_ok());
        assert!(limiter.check_at("10.0.0.1", start).await.is_ok());
        assert!(limiter.check_at("10.0.0.1", start).await.is_err());

        // ウィンドウ経過後はリセットされる
        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at("10.0.0.1", later).await.is_ok());
    }

    #[tokio::test]
    async fn test_buckets_are_per_ip() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        assert!(limiter.check_at("10.0.0.1", now).await.is_ok());
        assert!(limiter.check_at("10.0.0.2", now).await.is_ok());
        assert!(limiter.check_at("10.0.0.1", now).await.is_err());
    }

    #[test]
    fn test_extract_client_ip_prefers_forwarded_for() {
        let mut request = Request::new(Body::empty());
        request.headers_mut().insert(
            "x-forwarded-for",
            "203.0.113.5, 10.0.0.1".parse().unwrap(),
        );
        let ip = extract_client_ip(&request);
        assert_eq!(ip, "203.0.113.5");
    }

    #[test]
    fn test_extract_client_ip_unknown_without_headers() {
        let request = Request::new(Body::empty());
        let ip = extract_client_ip(&request);
        assert_eq!(ip, "unknown");
    }
}
