// consent-backend/src/repository/consent_log_repository.rs

use crate::db::DbPool;
use crate::domain::consent_log_model::{ActiveModel, Column, Entity, Model};
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use sea_orm::*;

/// 同意ログ検索用フィルタ
///
/// 集計前にクエリ段階で適用される。集計後の絞り込みは行わない。
#[derive(Debug, Clone, Default)]
pub struct ConsentLogFilter {
    pub language: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ConsentLogRepository {
    db: DbPool,
}

impl ConsentLogRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// 同意ログを追記（更新・削除パスは存在しない）
    pub async fn create(&self, log: &Model) -> AppResult<Model> {
        let active_model = ActiveModel {
            id: Set(log.id),
            session_id: Set(log.session_id.clone()),
            language: Set(log.language.clone()),
            action: Set(log.action.clone()),
            consent_data: Set(log.consent_data.clone()),
            ip_address: Set(log.ip_address.clone()),
            user_agent: Set(log.user_agent.clone()),
            referrer: Set(log.referrer.clone()),
            created_at: Set(log.created_at),
        };

        let result = active_model.insert(&self.db).await?;
        Ok(result)
    }

    /// フィルタを適用してログを取得
    pub async fn find_filtered(&self, filter: &ConsentLogFilter) -> AppResult<Vec<Model>> {
        let mut query = Entity::find();

        // フィルタ条件を適用
        if let Some(language) = &filter.language {
            query = query.filter(Column::Language.eq(language.as_str()));
        }
        if let Some(from) = filter.created_after {
            query = query.filter(Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.created_before {
            query = query.filter(Column::CreatedAt.lte(to));
        }

        let logs = query
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(logs)
    }

    /// フィルタ適用後の件数を取得
    pub async fn count_filtered(&self, filter: &ConsentLogFilter) -> AppResult<u64> {
        let mut query = Entity::find();

        if let Some(language) = &filter.language {
            query = query.filter(Column::Language.eq(language.as_str()));
        }
        if let Some(from) = filter.created_after {
            query = query.filter(Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.created_before {
            query = query.filter(Column::CreatedAt.lte(to));
        }

        let count = query.count(&self.db).await?;
        Ok(count)
    }
}
