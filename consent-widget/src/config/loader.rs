// consent-widget/src/config/loader.rs

use crate::config::defaults::default_config_value;
use crate::config::merge::layered_merge;
use crate::config::WidgetConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration as StdDuration;
use tokio::sync::Mutex;

/// 設定取得のデフォルトタイムアウト
pub const DEFAULT_FETCH_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// 設定取得の差し替え点
#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    async fn fetch(&self, language: &str) -> Result<Value, FetchError>;
}

/// 設定サービスの言語別エンドポイントを叩くフェッチャ
pub struct HttpConfigFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpConfigFetcher {
    pub fn new(base_url: &str, timeout: StdDuration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_default_timeout(base_url: &str) -> Result<Self, FetchError> {
        Self::new(base_url, DEFAULT_FETCH_TIMEOUT)
    }
}

#[async_trait]
impl ConfigFetcher for HttpConfigFetcher {
    async fn fetch(&self, language: &str) -> Result<Value, FetchError> {
        let url = format!("{}/cookie-config/{}", self.base_url, language);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| FetchError::MalformedBody)?;

        // エンベロープ {success, data, ...} からdataを取り出す
        match body.get("data") {
            Some(data) if body.get("success").and_then(Value::as_bool) == Some(true) => {
                Ok(data.clone())
            }
            _ => Err(FetchError::MalformedBody),
        }
    }
}

struct CachedEntry {
    value: Value,
    fetched_at: DateTime<Utc>,
}

/// 言語別設定のローダー
///
/// TTL付きインプロセスキャッシュを前段に置き、取得失敗時は同梱デフォルトに
/// フォールバックする。呼び出し側にエラーを返すことはない。
pub struct ConfigLoader {
    fetcher: Box<dyn ConfigFetcher>,
    cache: Mutex<HashMap<String, CachedEntry>>,
    ttl: Duration,
    overrides: Option<Value>,
    current_language: Mutex<String>,
}

impl ConfigLoader {
    pub fn new(fetcher: Box<dyn ConfigFetcher>, ttl_seconds: i64, overrides: Option<Value>) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(ttl_seconds),
            overrides,
            current_language: Mutex::new(crate::config::defaults::DEFAULT_LANGUAGE.to_string()),
        }
    }

    /// 言語別設定をロードする
    ///
    /// 新鮮なキャッシュがあればネットワークに出ない。
    pub async fn load(&self, language: &str) -> WidgetConfig {
        let language = language.trim().to_lowercase();

        // キャッシュをチェック
        {
            let cache = self.cache.lock().await;
            if let Some(entry) = cache.get(&language) {
                let age = Utc::now() - entry.fetched_at;
                if age < self.ttl {
                    return self.build_config(&language, Some(&entry.value));
                }
            }
        }

        // キャッシュミスの場合のみ取得
        match self.fetcher.fetch(&language).await {
            Ok(value) => {
                let mut cache = self.cache.lock().await;
                let config = self.build_config(&language, Some(&value));
                cache.insert(
                    language,
                    CachedEntry {
                        value,
                        fetched_at: Utc::now(),
                    },
                );
                config
            }
            Err(error) => {
                // 失敗は呼び出し側に伝播させず、同梱デフォルトへ
                tracing::debug!(language = %language, error = %error, "Config fetch failed, using bundled defaults");
                self.build_config(&language, None)
            }
        }
    }

    /// 言語を切り替え、キャッシュをバイパスして再ロードする
    pub async fn set_language(&self, language: &str) -> WidgetConfig {
        let normalized = language.trim().to_lowercase();

        {
            let mut current = self.current_language.lock().await;
            *current = normalized.clone();
        }
        {
            let mut cache = self.cache.lock().await;
            cache.remove(&normalized);
        }

        self.load(&normalized).await
    }

    pub async fn current_language(&self) -> String {
        self.current_language.lock().await.clone()
    }

    /// defaults < fetched < overrides を重ねてWidgetConfigを組み立てる
    fn build_config(&self, language: &str, fetched: Option<&Value>) -> WidgetConfig {
        let merged = layered_merge(
            default_config_value(language),
            fetched,
            self.overrides.as_ref(),
        );

        match serde_json::from_value(merged) {
            Ok(config) => config,
            Err(error) => {
                // マージ結果が壊れていてもバナーは機能し続けなければならない
                tracing::debug!(language = %language, error = %error, "Merged config malformed, using bundled defaults");
                serde_json::from_value(layered_merge(
                    default_config_value(language),
                    None,
                    self.overrides.as_ref(),
                ))
                .unwrap_or_default()
            }
        }
    }

    #[cfg(test)]
    async fn age_cache_entry(&self, language: &str, seconds: i64) {
        let mut cache = self.cache.lock().await;
        if let Some(entry) = cache.get_mut(language) {
            entry.fetched_at = entry.fetched_at - Duration::seconds(seconds);
        }
    }
}
