// consent-backend/src/api/dto/cookie_config_dto.rs

use crate::domain::cookie_config_model;
use crate::utils::validation::{validate_hex_color, validate_same_site};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- Request DTOs ---

/// バナー・モーダルの表示テキスト
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TextsDto {
    #[validate(length(
        min = 1,
        max = 200,
        message = "must be between 1 and 200 characters"
    ))]
    pub banner_title: String,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "must be between 1 and 2000 characters"
    ))]
    pub banner_message: String,

    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub accept_button: String,

    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub reject_button: String,

    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub customize_button: String,

    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub save_button: String,

    #[validate(length(
        min = 1,
        max = 200,
        message = "must be between 1 and 200 characters"
    ))]
    pub modal_title: String,

    #[validate(length(max = 2000, message = "must not exceed 2000 characters"))]
    #[serde(default)]
    pub modal_description: Option<String>,
}

/// クッキーカテゴリ定義
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "must not exceed 500 characters"))]
    #[serde(default)]
    pub description: Option<String>,

    pub required: bool,

    /// このカテゴリに属するクッキー名の一覧
    #[serde(default)]
    pub cookie_names: Vec<String>,

    #[serde(default)]
    pub display_order: i32,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// UIテーマトークン
#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UiDto {
    #[validate(custom(function = validate_hex_color))]
    pub primary_color: String,

    #[validate(custom(function = validate_hex_color))]
    pub secondary_color: String,

    #[validate(custom(function = validate_hex_color))]
    pub background_color: String,

    #[validate(custom(function = validate_hex_color))]
    pub text_color: String,

    #[validate(length(max = 200, message = "must not exceed 200 characters"))]
    #[serde(default)]
    pub font_family: Option<String>,

    /// バナーの表示位置（"top" / "bottom" など、描画側の解釈に委ねる）
    #[serde(default)]
    pub position: Option<String>,
}

/// 同意クッキーの属性設定
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CookieSettingsDto {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(range(min = 1, max = 3650, message = "must be between 1 and 3650 days"))]
    pub expiry_days: u32,

    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub path: String,

    #[serde(default)]
    pub domain: Option<String>,

    pub secure: bool,

    #[validate(custom(function = validate_same_site))]
    pub same_site: String,
}

impl Default for CookieSettingsDto {
    fn default() -> Self {
        Self {
            name: "ns-cookie-consent".to_string(),
            expiry_days: 365,
            path: "/".to_string(),
            domain: None,
            secure: true,
            same_site: "Lax".to_string(),
        }
    }
}

/// 設定ドキュメントの作成・全上書きリクエスト
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCookieConfigDto {
    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[validate(nested)]
    pub texts: TextsDto,

    #[validate(nested)]
    pub categories: Vec<CategoryDto>,

    #[validate(nested)]
    pub ui: UiDto,

    #[validate(nested)]
    #[serde(default)]
    pub cookie: CookieSettingsDto,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub version: String,
}

fn default_true() -> bool {
    true
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CookieConfigResponse {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub texts: TextsDto,
    pub categories: Vec<CategoryDto>,
    pub ui: UiDto,
    pub cookie: CookieSettingsDto,
    pub enabled: bool,
    pub version: String,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl From<cookie_config_model::Model> for CookieConfigResponse {
    fn from(model: cookie_config_model::Model) -> Self {
        // JSONカラムは書き込み時に検証済みのため、想定外の形は既定値に落とす
        Self {
            language: model.language,
            country: model.country,
            region: model.region,
            texts: serde_json::from_value(model.texts).unwrap_or_default(),
            categories: serde_json::from_value(model.categories).unwrap_or_default(),
            ui: serde_json::from_value(model.ui).unwrap_or_default(),
            cookie: serde_json::from_value(model.cookie_settings).unwrap_or_default(),
            enabled: model.enabled,
            version: model.version,
            updated_at: model.updated_at,
            updated_by: model.updated_by,
        }
    }
}

/// 利用可能な言語の一覧エントリ
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailableLanguageDto {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl From<&cookie_config_model::Model> for AvailableLanguageDto {
    fn from(model: &cookie_config_model::Model) -> Self {
        Self {
            language: model.language.clone(),
            country: model.country.clone(),
            region: model.region.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::flatten_validation_errors;

    fn valid_payload() -> UpsertCookieConfigDto {
        UpsertCookieConfigDto {
            country: Some("DE".to_string()),
            region: None,
            texts: TextsDto {
                banner_title: "We use cookies".to_string(),
                banner_message: "This site uses cookies to improve your experience.".to_string(),
                accept_button: "Accept all".to_string(),
                reject_button: "Reject all".to_string(),
                customize_button: "Customize".to_string(),
                save_button: "Save preferences".to_string(),
                modal_title: "Cookie preferences".to_string(),
                modal_description: None,
            },
            categories: vec![
                CategoryDto {
                    name: "essential".to_string(),
                    description: Some("Required for the site to function".to_string()),
                    required: true,
                    cookie_names: vec!["session".to_string()],
                    display_order: 0,
                    enabled: true,
                },
                CategoryDto {
                    name: "analytics".to_string(),
                    description: None,
                    required: false,
                    cookie_names: vec!["_ga".to_string(), "_gid".to_string()],
                    display_order: 1,
                    enabled: true,
                },
            ],
            ui: UiDto {
                primary_color: "#336699".to_string(),
                secondary_color: "#eeeeee".to_string(),
                background_color: "#ffffff".to_string(),
                text_color: "#222222".to_string(),
                font_family: None,
                position: Some("bottom".to_string()),
            },
            cookie: CookieSettingsDto::default(),
            enabled: true,
            version: "1.0".to_string(),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(valid_payload().validate().is_ok());
    }

    #[test]
    fn test_invalid_primary_color_names_field() {
        let mut payload = valid_payload();
        payload.ui.primary_color = "blue".to_string();

        let errors = payload.validate().unwrap_err();
        let messages = flatten_validation_errors(&errors);
        assert!(
            messages
                .iter()
                .any(|m| m.starts_with("ui.primaryColor:")),
            "expected ui.primaryColor in {:?}",
            messages
        );
    }

    #[test]
    fn test_empty_banner_title_rejected() {
        let mut payload = valid_payload();
        payload.texts.banner_title = String::new();

        let errors = payload.validate().unwrap_err();
        let messages = flatten_validation_errors(&errors);
        assert!(messages.iter().any(|m| m.starts_with("texts.bannerTitle:")));
    }

    #[test]
    fn test_invalid_same_site_rejected() {
        let mut payload = valid_payload();
        payload.cookie.same_site = "Whatever".to_string();

        let errors = payload.validate().unwrap_err();
        let messages = flatten_validation_errors(&errors);
        assert!(messages.iter().any(|m| m.starts_with("cookie.sameSite:")));
    }

    #[test]
    fn test_category_index_in_error_path() {
        let mut payload = valid_payload();
        payload.categories[1].name = String::new();

        let errors = payload.validate().unwrap_err();
        let messages = flatten_validation_errors(&errors);
        assert!(
            messages.iter().any(|m| m.starts_with("categories[1].name:")),
            "expected categories[1].name in {:?}",
            messages
        );
    }
}
