// consent-backend/src/api/dto/consent_log_dto.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

/// ウィジェットが送信する同意スナップショット
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConsentDataDto {
    /// カテゴリ名 -> 同意有無
    pub categories: BTreeMap<String, bool>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
}

/// 同意イベントの記録リクエスト
#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogConsentDto {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub session_id: String,

    #[validate(length(min = 2, max = 10, message = "must be between 2 and 10 characters"))]
    pub language: String,

    /// accept / reject / customize / save / withdraw のいずれか
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub action: String,

    pub consent_data: ConsentDataDto,

    #[validate(length(max = 2000, message = "must not exceed 2000 characters"))]
    #[serde(default)]
    pub referrer: Option<String>,
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LogConsentResponse {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_data_requires_categories() {
        // categories欠落は型レベルで弾かれる
        let missing: Result<ConsentDataDto, _> =
            serde_json::from_str(r#"{"timestamp": 1, "version": "1.0"}"#);
        assert!(missing.is_err());

        let present: ConsentDataDto =
            serde_json::from_str(r#"{"categories": {"essential": true}}"#).unwrap();
        assert_eq!(present.categories.get("essential"), Some(&true));
    }

    #[test]
    fn test_log_consent_deserializes_camel_case() {
        let dto: LogConsentDto = serde_json::from_str(
            r#"{
                "sessionId": "sess-1",
                "language": "en",
                "action": "accept",
                "consentData": {"categories": {"essential": true, "analytics": true}}
            }"#,
        )
        .unwrap();

        assert_eq!(dto.session_id, "sess-1");
        assert_eq!(dto.action, "accept");
        assert!(dto.referrer.is_none());
        assert_eq!(dto.consent_data.categories.len(), 2);
    }
}
