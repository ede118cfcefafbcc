// consent-widget/src/blocker.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ブロック対象のリソース種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Script,
    Iframe,
    Pixel,
}

/// ブロックルール（コードではなくデータ）
///
/// patternはドメイン部分文字列。resource_kindsが空なら全種別に適用する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRule {
    pub id: String,
    pub pattern: String,
    pub category: String,
    pub enabled: bool,
    #[serde(default)]
    pub resource_kinds: Vec<ResourceKind>,
}

impl BlockRule {
    pub fn new(id: &str, pattern: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            pattern: pattern.to_string(),
            category: category.to_string(),
            enabled: true,
            resource_kinds: Vec::new(),
        }
    }

    fn applies_to(&self, kind: ResourceKind) -> bool {
        self.resource_kinds.is_empty() || self.resource_kinds.contains(&kind)
    }
}

/// 判定結果
///
/// Blockは「ネットワークリクエストを発火させるな」の指示。抑止自体は
/// 埋め込みシェル側の責務（非表示にするだけでは足りない）。
#[derive(Debug, Clone, PartialEq)]
pub enum BlockDecision {
    Allow,
    Block { rule_id: String, category: String },
}

/// スクリプト・iframe・ピクセルのロード判定
///
/// ルールはカテゴリごとに独立して判定される。カテゴリが同意済みになれば、
/// 以降のロード試行は通る（抑止済みロードの自動リトライはしない）。
pub struct AutoBlocker {
    rules: Vec<BlockRule>,
}

impl AutoBlocker {
    pub fn new(rules: Vec<BlockRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[BlockRule] {
        &self.rules
    }

    pub fn add_rule(&mut self, rule: BlockRule) {
        self.rules.push(rule);
    }

    /// idでルールを取り除く。見つかったらtrue。
    pub fn remove_rule(&mut self, id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id != id);
        self.rules.len() != before
    }

    /// idでルールの有効・無効を切り替える。見つかったらtrue。
    pub fn set_rule_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|rule| rule.id == id) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// URLのロード可否を判定する
    ///
    /// 有効なルールに部分文字列一致し、かつそのカテゴリが未同意ならBlock。
    pub fn evaluate(
        &self,
        url: &str,
        kind: ResourceKind,
        granted: &BTreeMap<String, bool>,
    ) -> BlockDecision {
        for rule in &self.rules {
            if !rule.enabled || !rule.applies_to(kind) {
                continue;
            }
            if !url.contains(&rule.pattern) {
                continue;
            }
            let category_granted = granted.get(&rule.category).copied().unwrap_or(false);
            if !category_granted {
                return BlockDecision::Block {
                    rule_id: rule.id.clone(),
                    category: rule.category.clone(),
                };
            }
        }
        BlockDecision::Allow
    }
}
