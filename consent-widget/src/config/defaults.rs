// consent-widget/src/config/defaults.rs

use serde_json::{json, Value};

/// 不明な言語のフォールバック先
pub const DEFAULT_LANGUAGE: &str = "en";

/// 同梱のデフォルト設定
///
/// 設定サービスに到達できない場合でもバナーは必ず機能しなければならない。
/// 未知の言語は英語にフォールバックする。
pub fn default_config_value(language: &str) -> Value {
    match language {
        "de" => json!({
            "language": "de",
            "texts": {
                "bannerTitle": "Wir verwenden Cookies",
                "bannerMessage": "Diese Website verwendet Cookies, um Ihr Erlebnis zu verbessern.",
                "acceptButton": "Alle akzeptieren",
                "rejectButton": "Alle ablehnen",
                "customizeButton": "Anpassen",
                "saveButton": "Einstellungen speichern",
                "modalTitle": "Cookie-Einstellungen"
            },
            "categories": default_categories(),
            "ui": default_ui(),
            "cookie": default_cookie(),
            "version": "1.0"
        }),
        "en" => english_default(),
        _ => english_default(),
    }
}

fn english_default() -> Value {
    json!({
        "language": "en",
        "texts": {
            "bannerTitle": "We use cookies",
            "bannerMessage": "This site uses cookies to improve your experience.",
            "acceptButton": "Accept all",
            "rejectButton": "Reject all",
            "customizeButton": "Customize",
            "saveButton": "Save preferences",
            "modalTitle": "Cookie preferences"
        },
        "categories": default_categories(),
        "ui": default_ui(),
        "cookie": default_cookie(),
        "version": "1.0"
    })
}

fn default_categories() -> Value {
    json!([
        {
            "name": "essential",
            "required": true,
            "cookieNames": [],
            "displayOrder": 0,
            "enabled": true
        },
        {
            "name": "analytics",
            "required": false,
            "cookieNames": ["_ga", "_gid"],
            "displayOrder": 1,
            "enabled": true
        },
        {
            "name": "marketing",
            "required": false,
            "cookieNames": ["_fbp"],
            "displayOrder": 2,
            "enabled": true
        },
        {
            "name": "preferences",
            "required": false,
            "cookieNames": [],
            "displayOrder": 3,
            "enabled": true
        }
    ])
}

fn default_ui() -> Value {
    json!({
        "primaryColor": "#2563eb",
        "secondaryColor": "#e5e7eb",
        "backgroundColor": "#ffffff",
        "textColor": "#111827",
        "position": "bottom"
    })
}

fn default_cookie() -> Value {
    json!({
        "name": "ns-cookie-consent",
        "expiryDays": 365,
        "path": "/",
        "secure": true,
        "sameSite": "Lax"
    })
}
