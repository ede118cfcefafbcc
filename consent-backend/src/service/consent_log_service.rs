// consent-backend/src/service/consent_log_service.rs

use crate::api::dto::analytics_dto::{
    ActionBreakdownDto, AnalyticsQueryDto, ComplianceStatus, ComplianceStatusResponse,
    ConsentAnalyticsResponse, LanguageConsentStatsDto,
};
use crate::api::dto::consent_log_dto::{LogConsentDto, LogConsentResponse};
use crate::domain::consent_log_model::{ConsentAction, Model};
use crate::domain::cookie_config_model::normalize_language;
use crate::error::{AppError, AppResult};
use crate::log_with_context;
use crate::repository::consent_log_repository::{ConsentLogFilter, ConsentLogRepository};
use crate::utils::validation::flatten_validation_errors;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct ConsentLogService {
    repository: Arc<ConsentLogRepository>,
}

impl ConsentLogService {
    pub fn new(repository: Arc<ConsentLogRepository>) -> Self {
        Self { repository }
    }

    /// 同意イベントを記録し、採番したIDを返す
    pub async fn log_consent(
        &self,
        payload: LogConsentDto,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<LogConsentResponse> {
        if let Err(errors) = payload.validate() {
            return Err(AppError::ValidationErrors(flatten_validation_errors(
                &errors,
            )));
        }

        // アクションは許可された5値のみ
        let action: ConsentAction = payload.action.as_str().try_into().map_err(|_| {
            AppError::ValidationError(format!(
                "action: must be one of accept, reject, customize, save, withdraw (got '{}')",
                payload.action
            ))
        })?;

        let entry = Model::new(
            payload.session_id,
            normalize_language(&payload.language),
            action,
            json!({
                "categories": payload.consent_data.categories,
                "timestamp": payload.consent_data.timestamp,
                "version": payload.consent_data.version,
            }),
            ip_address,
            user_agent,
            payload.referrer,
        );

        let saved = self.repository.create(&entry).await?;

        log_with_context!(
            tracing::Level::INFO,
            "Consent logged",
            "id" => saved.id,
            "action" => &saved.action,
            "language" => &saved.language
        );

        Ok(LogConsentResponse { id: saved.id })
    }

    /// 言語×アクションの二段集計
    pub async fn analytics(&self, query: AnalyticsQueryDto) -> AppResult<ConsentAnalyticsResponse> {
        let filter = build_filter(&query);
        let entries = self.repository.find_filtered(&filter).await?;
        Ok(aggregate_consents(&entries))
    }

    /// コンプライアンス状況
    ///
    /// 拒否率5%/10%の閾値はプレースホルダーポリシー（法的根拠なし）。
    pub async fn compliance_status(
        &self,
        query: AnalyticsQueryDto,
    ) -> AppResult<ComplianceStatusResponse> {
        let filter = build_filter(&query);
        let entries = self.repository.find_filtered(&filter).await?;
        Ok(compute_compliance(&entries))
    }
}

fn build_filter(query: &AnalyticsQueryDto) -> ConsentLogFilter {
    ConsentLogFilter {
        language: query.language.as_deref().map(normalize_language),
        created_after: query.from,
        created_before: query.to,
    }
}

/// 二段集計: (action, language)ごとの件数・最新時刻 -> 言語ごとの内訳と合計
fn aggregate_consents(entries: &[Model]) -> ConsentAnalyticsResponse {
    // 第一段: (action, language) -> (count, 最新タイムスタンプ)
    let mut by_action_language: BTreeMap<(String, String), (u64, DateTime<Utc>)> = BTreeMap::new();
    for entry in entries {
        let key = (entry.action.clone(), entry.language.clone());
        let slot = by_action_language
            .entry(key)
            .or_insert((0, entry.created_at));
        slot.0 += 1;
        if entry.created_at > slot.1 {
            slot.1 = entry.created_at;
        }
    }

    // 第二段: 言語 -> アクション内訳の配列と合計
    let mut by_language: BTreeMap<String, Vec<ActionBreakdownDto>> = BTreeMap::new();
    for ((action, language), (count, last_consent_at)) in by_action_language {
        by_language
            .entry(language)
            .or_default()
            .push(ActionBreakdownDto {
                action,
                count,
                last_consent_at,
            });
    }

    let languages = by_language
        .into_iter()
        .map(|(language, actions)| LanguageConsentStatsDto {
            language,
            total_consents: actions.iter().map(|a| a.count).sum(),
            actions,
        })
        .collect();

    ConsentAnalyticsResponse {
        languages,
        total_entries: entries.len() as u64,
    }
}

fn compute_compliance(entries: &[Model]) -> ComplianceStatusResponse {
    let total = entries.len() as u64;
    let rejections = entries
        .iter()
        .filter(|e| {
            e.get_action()
                .map(|a| a.is_rejection())
                .unwrap_or(false)
        })
        .count() as u64;

    let rejection_rate = if total == 0 {
        0.0
    } else {
        rejections as f64 / total as f64
    };

    let status = if rejection_rate < 0.05 {
        ComplianceStatus::Compliant
    } else if rejection_rate < 0.10 {
        ComplianceStatus::Partial
    } else {
        ComplianceStatus::NonCompliant
    };

    ComplianceStatusResponse {
        status,
        total_decisions: total,
        rejections,
        rejection_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn entry(action: &str, language: &str, at: DateTime<Utc>) -> Model {
        Model {
            id: Uuid::new_v4(),
            session_id: "sess".to_string(),
            language: language.to_string(),
            action: action.to_string(),
            consent_data: json!({"categories": {"essential": true}}),
            ip_address: None,
            user_agent: None,
            referrer: None,
            created_at: at,
        }
    }

    #[test]
    fn test_two_stage_aggregation() {
        let now = Utc::now();
        let entries = vec![
            entry("accept", "en", now - Duration::minutes(2)),
            entry("accept", "en", now),
            entry("reject", "de", now),
        ];

        let result = aggregate_consents(&entries);

        assert_eq!(result.total_entries, 3);
        assert_eq!(result.languages.len(), 2);

        // 言語コード昇順
        let de = &result.languages[0];
        assert_eq!(de.language, "de");
        assert_eq!(de.total_consents, 1);
        assert_eq!(de.actions.len(), 1);
        assert_eq!(de.actions[0].action, "reject");
        assert_eq!(de.actions[0].count, 1);

        let en = &result.languages[1];
        assert_eq!(en.language, "en");
        assert_eq!(en.total_consents, 2);
        assert_eq!(en.actions.len(), 1);
        assert_eq!(en.actions[0].action, "accept");
        assert_eq!(en.actions[0].count, 2);
        // 最新タイムスタンプを保持する
        assert_eq!(en.actions[0].last_consent_at, now);
    }

    #[test]
    fn test_aggregation_empty() {
        let result = aggregate_consents(&[]);
        assert_eq!(result.total_entries, 0);
        assert!(result.languages.is_empty());
    }

    #[test]
    fn test_compliance_thresholds() {
        let now = Utc::now();

        // 拒否 0/100 -> compliant
        let mut entries: Vec<Model> = (0..100).map(|_| entry("accept", "en", now)).collect();
        assert_eq!(
            compute_compliance(&entries).status,
            ComplianceStatus::Compliant
        );

        // 拒否 7/100 -> partial
        entries.truncate(93);
        entries.extend((0..7).map(|_| entry("reject", "en", now)));
        let result = compute_compliance(&entries);
        assert_eq!(result.status, ComplianceStatus::Partial);
        assert_eq!(result.rejections, 7);

        // 拒否 15/100 (withdrawも拒否扱い) -> non-compliant
        entries.truncate(85);
        entries.extend((0..10).map(|_| entry("reject", "en", now)));
        entries.extend((0..5).map(|_| entry("withdraw", "en", now)));
        assert_eq!(
            compute_compliance(&entries).status,
            ComplianceStatus::NonCompliant
        );
    }

    #[test]
    fn test_compliance_empty_is_compliant() {
        let result = compute_compliance(&[]);
        assert_eq!(result.status, ComplianceStatus::Compliant);
        assert_eq!(result.rejection_rate, 0.0);
    }
}
