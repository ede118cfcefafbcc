// consent-widget/src/consent/record.rs

use crate::config::CategoryDefinition;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 必須カテゴリの名前（常にtrueで永続化される）
pub const ESSENTIAL_CATEGORY: &str = "essential";

/// ユーザーの同意決定
///
/// 一度書き込まれたら不変。新しい決定は新しいレコードとしてクッキーを上書きする
/// （クライアント側に履歴は持たない）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// エポックミリ秒
    pub timestamp: i64,
    pub version: String,
    /// カテゴリ名 -> 同意有無
    pub categories: BTreeMap<String, bool>,
}

impl ConsentRecord {
    /// カテゴリ選択からレコードを作成する
    ///
    /// essentialは入力に関わらず強制的にtrueになる。
    pub fn new(version: &str, mut categories: BTreeMap<String, bool>) -> Self {
        categories.insert(ESSENTIAL_CATEGORY.to_string(), true);
        Self {
            timestamp: Utc::now().timestamp_millis(),
            version: version.to_string(),
            categories,
        }
    }

    /// 全カテゴリ同意のレコードを合成する
    pub fn accept_all(version: &str, definitions: &[CategoryDefinition]) -> Self {
        let categories = definitions
            .iter()
            .map(|definition| (definition.name.clone(), true))
            .collect();
        Self::new(version, categories)
    }

    /// 必須カテゴリのみ同意のレコードを合成する
    pub fn reject_all(version: &str, definitions: &[CategoryDefinition]) -> Self {
        let categories = definitions
            .iter()
            .map(|definition| (definition.name.clone(), definition.required))
            .collect();
        Self::new(version, categories)
    }

    pub fn is_granted(&self, category: &str) -> bool {
        self.categories.get(category).copied().unwrap_or(false)
    }

    /// クッキー値からの復元
    ///
    /// 構造的に不正な値（JSONでない、数値timestamp・文字列version・
    /// オブジェクトcategoriesのいずれかを欠く）は「同意なし」として扱い、
    /// エラーにはしない。
    pub fn from_cookie_value(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// クッキーに書き込むJSON値
    pub fn to_cookie_value(&self) -> String {
        // BTreeMapとプリミティブのみのためシリアライズは失敗しない
        serde_json::to_string(self).unwrap_or_default()
    }
}
