// consent-backend/src/service/config_cache_service.rs
//
// 言語別設定ドキュメントのインメモリTTLキャッシュ
// 共有マップへの同時アクセスで同一キーが二重にDB問い合わせされることは許容する
// （最後の書き込みが勝つ。単一インスタンス前提）

use crate::domain::cookie_config_model::Model;
use crate::log_with_context;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// キャッシュされた設定ドキュメント
#[derive(Clone, Debug)]
struct CachedConfig {
    config: Model,
    cached_at: DateTime<Utc>,
}

/// 設定ドキュメントのTTLキャッシュサービス
///
/// グローバルな可変マップではなく、明示的に構築してハンドラへ注入する。
#[derive(Clone)]
pub struct ConfigCacheService {
    cache: Arc<RwLock<HashMap<String, CachedConfig>>>,
    ttl: Duration,
    enabled: bool,
}

impl ConfigCacheService {
    pub fn new(ttl_seconds: i64, enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_seconds),
            enabled,
        }
    }

    /// 新鮮なキャッシュエントリを取得（期限切れ・無効化済みならNone）
    pub async fn get(&self, language: &str) -> Option<Model> {
        if !self.enabled {
            return None;
        }

        let cache = self.cache.read().await;
        if let Some(entry) = cache.get(language) {
            let age = Utc::now() - entry.cached_at;
            if age < self.ttl {
                log_with_context!(
                    tracing::Level::DEBUG,
                    "Config cache hit",
                    "language" => language,
                    "cache_age_seconds" => age.num_seconds()
                );
                return Some(entry.config.clone());
            }
        }
        None
    }

    /// キャッシュを更新
    pub async fn insert(&self, language: &str, config: Model) {
        if !self.enabled {
            return;
        }

        let mut cache = self.cache.write().await;
        cache.insert(
            language.to_string(),
            CachedConfig {
                config,
                cached_at: Utc::now(),
            },
        );
    }

    /// 書き込み時に該当言語のエントリを破棄する
    pub async fn invalidate(&self, language: &str) {
        log_with_context!(
            tracing::Level::DEBUG,
            "Invalidating config cache",
            "language" => language
        );
        let mut cache = self.cache.write().await;
        cache.remove(language);
    }

    /// すべてのエントリを破棄する
    pub async fn clear(&self) {
        log_with_context!(tracing::Level::INFO, "Clearing all config cache");
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    #[cfg(test)]
    async fn insert_with_age(&self, language: &str, config: Model, age_seconds: i64) {
        let mut cache = self.cache.write().await;
        cache.insert(
            language.to_string(),
            CachedConfig {
                config,
                cached_at: Utc::now() - Duration::seconds(age_seconds),
            },
        );
    }
}
