// consent-widget/src/config/merge.rs

use serde_json::Value;

/// 深い構造的マージ
///
/// マージ方針: ネストしたオブジェクトはキー単位でマージ、
/// 配列とプリミティブは丸ごと置換（連結はしない）。
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

/// defaults < fetched < overrides の順で重ねる
pub fn layered_merge(defaults: Value, fetched: Option<&Value>, overrides: Option<&Value>) -> Value {
    let mut merged = defaults;
    if let Some(fetched) = fetched {
        deep_merge(&mut merged, fetched);
    }
    if let Some(overrides) = overrides {
        deep_merge(&mut merged, overrides);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_objects_merge_key_by_key() {
        let mut base = json!({
            "ui": {"primaryColor": "#111111", "textColor": "#222222"},
            "language": "en"
        });
        let overlay = json!({
            "ui": {"primaryColor": "#336699"}
        });

        deep_merge(&mut base, &overlay);

        assert_eq!(base["ui"]["primaryColor"], "#336699");
        // 上書きされなかったキーは保持される
        assert_eq!(base["ui"]["textColor"], "#222222");
        assert_eq!(base["language"], "en");
    }

    #[test]
    fn test_arrays_replaced_wholesale() {
        let mut base = json!({"categories": [{"name": "essential"}, {"name": "analytics"}]});
        let overlay = json!({"categories": [{"name": "marketing"}]});

        deep_merge(&mut base, &overlay);

        let categories = base["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0]["name"], "marketing");
    }

    #[test]
    fn test_primitives_replaced() {
        let mut base = json!({"version": "1.0", "enabled": true});
        let overlay = json!({"version": "2.0"});

        deep_merge(&mut base, &overlay);

        assert_eq!(base["version"], "2.0");
        assert_eq!(base["enabled"], true);
    }

    #[test]
    fn test_layered_merge_precedence() {
        let defaults = json!({"ui": {"primaryColor": "#111111"}, "version": "1.0"});
        let fetched = json!({"ui": {"primaryColor": "#222222"}});
        let overrides = json!({"ui": {"primaryColor": "#333333"}});

        let merged = layered_merge(defaults, Some(&fetched), Some(&overrides));

        // 呼び出し側オーバーライドが最優先
        assert_eq!(merged["ui"]["primaryColor"], "#333333");
        assert_eq!(merged["version"], "1.0");
    }
}
