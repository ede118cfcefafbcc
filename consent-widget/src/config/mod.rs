// consent-widget/src/config/mod.rs

pub mod defaults;
pub mod loader;
pub mod merge;

use crate::cookie::CookieAttributes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// クッキーカテゴリ定義（設定ドキュメント由来、実行時は読み取り専用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryDefinition {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub cookie_names: Vec<String>,
    pub display_order: i32,
    pub enabled: bool,
}

impl CategoryDefinition {
    pub fn new(name: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            required,
            enabled: true,
            ..Self::default()
        }
    }
}

/// UIテーマトークン
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UiTheme {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: Option<String>,
    pub position: Option<String>,
}

/// ウィジェットが利用する言語別設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub language: String,
    pub texts: BTreeMap<String, String>,
    pub categories: Vec<CategoryDefinition>,
    pub ui: UiTheme,
    pub cookie: CookieAttributes,
    pub version: String,
}
