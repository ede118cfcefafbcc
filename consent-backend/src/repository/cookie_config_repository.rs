// consent-backend/src/repository/cookie_config_repository.rs

use crate::db::DbPool;
use crate::domain::cookie_config_model::{ActiveModel, Column, Entity, Model};
use crate::error::AppResult;
use sea_orm::*;

#[derive(Clone)]
pub struct CookieConfigRepository {
    db: DbPool,
}

impl CookieConfigRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// 有効な設定ドキュメントを言語コードで取得
    ///
    /// 言語コードは呼び出し側で正規化済みであること。
    pub async fn find_enabled_by_language(&self, language: &str) -> AppResult<Option<Model>> {
        let config = Entity::find()
            .filter(Column::Language.eq(language))
            .filter(Column::Enabled.eq(true))
            .one(&self.db)
            .await?;

        Ok(config)
    }

    /// 有効・無効を問わず言語コードで取得（管理系の上書き・削除用）
    pub async fn find_by_language(&self, language: &str) -> AppResult<Option<Model>> {
        let config = Entity::find()
            .filter(Column::Language.eq(language))
            .one(&self.db)
            .await?;

        Ok(config)
    }

    /// 有効なドキュメントを言語コード昇順ですべて取得
    pub async fn find_all_enabled(&self) -> AppResult<Vec<Model>> {
        let configs = Entity::find()
            .filter(Column::Enabled.eq(true))
            .order_by_asc(Column::Language)
            .all(&self.db)
            .await?;

        Ok(configs)
    }

    /// すべてのドキュメントを言語コード昇順で取得（管理画面用）
    pub async fn find_all(&self) -> AppResult<Vec<Model>> {
        let configs = Entity::find()
            .order_by_asc(Column::Language)
            .all(&self.db)
            .await?;

        Ok(configs)
    }

    /// ドキュメントを作成または全上書きする
    ///
    /// 既存の同一言語キーがあれば id と created_at を引き継いで完全に置き換える。
    pub async fn upsert(&self, model: Model) -> AppResult<Model> {
        let existing = self.find_by_language(&model.language).await?;

        let result = match existing {
            Some(current) => {
                let active = ActiveModel {
                    id: Set(current.id),
                    language: Set(model.language),
                    country: Set(model.country),
                    region: Set(model.region),
                    texts: Set(model.texts),
                    categories: Set(model.categories),
                    ui: Set(model.ui),
                    cookie_settings: Set(model.cookie_settings),
                    enabled: Set(model.enabled),
                    version: Set(model.version),
                    created_at: Set(current.created_at),
                    updated_at: Set(model.updated_at),
                    updated_by: Set(model.updated_by),
                };
                active.update(&self.db).await?
            }
            None => {
                let active = ActiveModel {
                    id: Set(model.id),
                    language: Set(model.language),
                    country: Set(model.country),
                    region: Set(model.region),
                    texts: Set(model.texts),
                    categories: Set(model.categories),
                    ui: Set(model.ui),
                    cookie_settings: Set(model.cookie_settings),
                    enabled: Set(model.enabled),
                    version: Set(model.version),
                    created_at: Set(model.created_at),
                    updated_at: Set(model.updated_at),
                    updated_by: Set(model.updated_by),
                };
                active.insert(&self.db).await?
            }
        };

        Ok(result)
    }

    /// 言語コードで削除し、削除できたかを返す
    pub async fn delete_by_language(&self, language: &str) -> AppResult<bool> {
        let result = Entity::delete_many()
            .filter(Column::Language.eq(language))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
