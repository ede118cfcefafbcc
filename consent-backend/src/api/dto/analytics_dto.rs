// consent-backend/src/api/dto/analytics_dto.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Query DTOs ---

/// 集計クエリ（期間・言語は集計前にクエリ段階で適用される）
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQueryDto {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language: Option<String>,
}

// --- Response DTOs ---

/// アクション別の内訳
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionBreakdownDto {
    pub action: String,
    pub count: u64,
    pub last_consent_at: DateTime<Utc>,
}

/// 言語ごとの集計結果
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConsentStatsDto {
    pub language: String,
    pub total_consents: u64,
    pub actions: Vec<ActionBreakdownDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConsentAnalyticsResponse {
    pub languages: Vec<LanguageConsentStatsDto>,
    pub total_entries: u64,
}

/// コンプライアンス状況（プレースホルダーポリシー）
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatusResponse {
    pub status: ComplianceStatus,
    pub total_decisions: u64,
    pub rejections: u64,
    pub rejection_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    Partial,
    NonCompliant,
}
