// consent-backend/src/service/cookie_config_service.rs

use crate::api::dto::cookie_config_dto::{
    AvailableLanguageDto, CookieConfigResponse, UpsertCookieConfigDto,
};
use crate::domain::cookie_config_model::{normalize_language, Model};
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::cookie_config_repository::CookieConfigRepository;
use crate::service::config_cache_service::ConfigCacheService;
use crate::types::ConfigSource;
use crate::utils::validation::{flatten_validation_errors, validate_language_code};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct CookieConfigService {
    repository: Arc<CookieConfigRepository>,
    cache: Arc<ConfigCacheService>,
}

impl CookieConfigService {
    pub fn new(repository: Arc<CookieConfigRepository>, cache: Arc<ConfigCacheService>) -> Self {
        Self { repository, cache }
    }

    /// 言語コードで有効な設定を取得する
    ///
    /// 新鮮なキャッシュがあればそれを返し、なければDBを引いてキャッシュを温める。
    pub async fn get_by_language(
        &self,
        language: &str,
    ) -> AppResult<(CookieConfigResponse, ConfigSource)> {
        let language = self.normalize_and_check(language)?;

        if let Some(cached) = self.cache.get(&language).await {
            return Ok((cached.into(), ConfigSource::Cache));
        }

        let config = self
            .repository
            .find_enabled_by_language(&language)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No cookie configuration for language: {}", language))
            })?;

        self.cache.insert(&language, config.clone()).await;

        log_with_context!(
            tracing::Level::DEBUG,
            "Config served from database",
            "language" => &language
        );

        Ok((config.into(), ConfigSource::Database))
    }

    /// 有効なドキュメントの言語一覧（言語コード昇順）
    pub async fn get_available(&self) -> AppResult<Vec<AvailableLanguageDto>> {
        let configs = self.repository.find_all_enabled().await?;
        Ok(configs.iter().map(AvailableLanguageDto::from).collect())
    }

    /// すべてのドキュメントを返す（管理画面用、無効も含む）
    pub async fn list_all(&self) -> AppResult<Vec<CookieConfigResponse>> {
        let configs = self.repository.find_all().await?;
        Ok(configs.into_iter().map(Into::into).collect())
    }

    /// ドキュメントを作成または全上書きし、該当言語のキャッシュを破棄する
    pub async fn upsert(
        &self,
        language: &str,
        payload: UpsertCookieConfigDto,
        updated_by: &str,
    ) -> AppResult<CookieConfigResponse> {
        let language = self.normalize_and_check(language)?;
        validate_payload(&payload)?;

        let now = Utc::now();
        let model = Model {
            id: Uuid::new_v4(),
            language: language.clone(),
            country: payload.country.clone(),
            region: payload.region.clone(),
            texts: serde_json::to_value(&payload.texts)
                .map_err(|e| AppError::InternalServerError(e.to_string()))?,
            categories: serde_json::to_value(&payload.categories)
                .map_err(|e| AppError::InternalServerError(e.to_string()))?,
            ui: serde_json::to_value(&payload.ui)
                .map_err(|e| AppError::InternalServerError(e.to_string()))?,
            cookie_settings: serde_json::to_value(&payload.cookie)
                .map_err(|e| AppError::InternalServerError(e.to_string()))?,
            enabled: payload.enabled,
            version: payload.version.clone(),
            created_at: now,
            updated_at: now,
            updated_by: Some(updated_by.to_string()),
        };

        let saved = self.repository.upsert(model).await?;

        // 書き込みがキャッシュを無効化する（古いエントリが残ってはならない）
        self.cache.invalidate(&language).await;

        log_with_context!(
            tracing::Level::INFO,
            "Cookie configuration upserted",
            "language" => &language,
            "updated_by" => updated_by
        );

        Ok(saved.into())
    }

    /// ドキュメントを削除し、キャッシュを破棄する
    pub async fn delete(&self, language: &str) -> AppResult<()> {
        let language = self.normalize_and_check(language)?;

        let deleted = self.repository.delete_by_language(&language).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "No cookie configuration for language: {}",
                language
            )));
        }

        self.cache.invalidate(&language).await;

        log_with_context!(
            tracing::Level::INFO,
            "Cookie configuration deleted",
            "language" => &language
        );

        Ok(())
    }

    fn normalize_and_check(&self, language: &str) -> AppResult<String> {
        let normalized = normalize_language(language);
        validate_language_code(&normalized)
            .map_err(|_| AppError::BadRequest(format!("Invalid language code: {}", language)))?;
        Ok(normalized)
    }
}

/// リクエストボディのバリデーション
///
/// フィールド単位のメッセージをすべて集めてから返す。ストアには一切触れない。
fn validate_payload(payload: &UpsertCookieConfigDto) -> AppResult<()> {
    let mut messages = match payload.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => flatten_validation_errors(&errors),
    };

    // essentialカテゴリは常にrequired
    for (index, category) in payload.categories.iter().enumerate() {
        if category.name == "essential" && !category.required {
            messages.push(format!(
                "categories[{}].required: essential category must be required",
                index
            ));
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationErrors(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::cookie_config_dto::{CategoryDto, CookieSettingsDto, TextsDto, UiDto};

    fn payload() -> UpsertCookieConfigDto {
        UpsertCookieConfigDto {
            country: None,
            region: None,
            texts: TextsDto {
                banner_title: "We use cookies".to_string(),
                banner_message: "Message".to_string(),
                accept_button: "Accept".to_string(),
                reject_button: "Reject".to_string(),
                customize_button: "Customize".to_string(),
                save_button: "Save".to_string(),
                modal_title: "Preferences".to_string(),
                modal_description: None,
            },
            categories: vec![CategoryDto {
                name: "essential".to_string(),
                description: None,
                required: true,
                cookie_names: vec![],
                display_order: 0,
                enabled: true,
            }],
            ui: UiDto {
                primary_color: "#336699".to_string(),
                secondary_color: "#eeeeee".to_string(),
                background_color: "#ffffff".to_string(),
                text_color: "#222222".to_string(),
                font_family: None,
                position: None,
            },
            cookie: CookieSettingsDto::default(),
            enabled: true,
            version: "1.0".to_string(),
        }
    }

    #[test]
    fn test_validate_payload_accepts_valid() {
        assert!(validate_payload(&payload()).is_ok());
    }

    #[test]
    fn test_validate_payload_rejects_named_color() {
        let mut p = payload();
        p.ui.primary_color = "blue".to_string();

        match validate_payload(&p) {
            Err(AppError::ValidationErrors(messages)) => {
                assert!(messages.iter().any(|m| m.starts_with("ui.primaryColor:")));
            }
            other => panic!("expected validation errors, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_validate_payload_enforces_essential_required() {
        let mut p = payload();
        p.categories[0].required = false;

        match validate_payload(&p) {
            Err(AppError::ValidationErrors(messages)) => {
                assert!(messages
                    .iter()
                    .any(|m| m.contains("essential category must be required")));
            }
            other => panic!("expected validation errors, got {:?}", other.err()),
        }
    }
}
