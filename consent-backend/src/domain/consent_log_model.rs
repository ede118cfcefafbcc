// consent-backend/src/domain/consent_log_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 同意ログで許可されるアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum ConsentAction {
    Accept,
    Reject,
    Customize,
    Save,
    Withdraw,
}

// Conversion implementations for ConsentAction
impl From<ConsentAction> for String {
    fn from(action: ConsentAction) -> Self {
        action.as_str().to_string()
    }
}

impl TryFrom<&str> for ConsentAction {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "accept" => Ok(ConsentAction::Accept),
            "reject" => Ok(ConsentAction::Reject),
            "customize" => Ok(ConsentAction::Customize),
            "save" => Ok(ConsentAction::Save),
            "withdraw" => Ok(ConsentAction::Withdraw),
            _ => Err(format!("Invalid consent action: {}", value)),
        }
    }
}

impl ConsentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentAction::Accept => "accept",
            ConsentAction::Reject => "reject",
            ConsentAction::Customize => "customize",
            ConsentAction::Save => "save",
            ConsentAction::Withdraw => "withdraw",
        }
    }

    /// 同意の撤回・拒否とみなすアクションか
    pub fn is_rejection(&self) -> bool {
        matches!(self, ConsentAction::Reject | ConsentAction::Withdraw)
    }
}

/// 同意イベントの追記専用ログ
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consent_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub session_id: String,
    pub language: String,
    pub action: String,
    /// カテゴリ別の同意スナップショット {categories, timestamp, version}
    pub consent_data: Json,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 新しいログエントリを作成（サーバー側タイムスタンプを付与）
    pub fn new(
        session_id: String,
        language: String,
        action: ConsentAction,
        consent_data: Json,
        ip_address: Option<String>,
        user_agent: Option<String>,
        referrer: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            language,
            action: action.into(),
            consent_data,
            ip_address,
            user_agent,
            referrer,
            created_at: Utc::now(),
        }
    }

    pub fn get_action(&self) -> Result<ConsentAction, String> {
        self.action.as_str().try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_round_trip() {
        for action in [
            ConsentAction::Accept,
            ConsentAction::Reject,
            ConsentAction::Customize,
            ConsentAction::Save,
            ConsentAction::Withdraw,
        ] {
            let s: String = action.into();
            assert_eq!(ConsentAction::try_from(s.as_str()).unwrap(), action);
        }
    }

    #[test]
    fn test_invalid_action_rejected() {
        assert!(ConsentAction::try_from("optout").is_err());
        assert!(ConsentAction::try_from("ACCEPT").is_err());
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = Model::new(
            "sess-1".to_string(),
            "en".to_string(),
            ConsentAction::Accept,
            json!({"categories": {"essential": true}, "timestamp": 1, "version": "1.0"}),
            Some("192.168.1.1".to_string()),
            Some("Mozilla/5.0".to_string()),
            None,
        );

        assert_eq!(entry.get_action().unwrap(), ConsentAction::Accept);
        assert_eq!(entry.language, "en");
        assert!(entry.referrer.is_none());
    }

    #[test]
    fn test_is_rejection() {
        assert!(ConsentAction::Reject.is_rejection());
        assert!(ConsentAction::Withdraw.is_rejection());
        assert!(!ConsentAction::Accept.is_rejection());
        assert!(!ConsentAction::Save.is_rejection());
    }
}
