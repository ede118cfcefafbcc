// consent-backend/src/domain/cookie_config_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 言語別クッキー同意設定ドキュメント
///
/// texts / categories / ui / cookie_settings はJSONカラムとして保持し、
/// 型付きのDTO（api::dto::cookie_config_dto）との変換はサービス層で行う。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cookie_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// 小文字正規化済みのISO-639-1言語コード（例: "en", "pt-br"）
    #[sea_orm(unique)]
    pub language: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub texts: Json,
    pub categories: Json,
    pub ui: Json,
    pub cookie_settings: Json,
    pub enabled: bool,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// 言語コードを検索・保存前に正規化する
///
/// 大文字・前後空白の揺れを吸収する。キーの一意性はこの形に対して保証される。
pub fn normalize_language(language: &str) -> String {
    language.trim().to_lowercase()
}
