// consent-widget/src/cookie.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// 同意クッキーのsameSite属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// 同意クッキーの属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CookieAttributes {
    pub name: String,
    pub expiry_days: u32,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            name: "ns-cookie-consent".to_string(),
            expiry_days: 365,
            path: "/".to_string(),
            domain: None,
            secure: true,
            same_site: SameSite::Lax,
        }
    }
}

/// クッキーの読み書きの差し替え点
///
/// ブラウザ環境では document.cookie を背後に持つアダプタを実装する。
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, attributes: &CookieAttributes, value: &str);
    fn remove(&self, attributes: &CookieAttributes);
}

/// テスト・非ブラウザホスト用のインメモリ実装
///
/// Cloneで同じ内部マップを共有する。
#[derive(Clone, Default)]
pub struct MemoryCookieStore {
    cookies: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies
            .lock()
            .ok()
            .and_then(|cookies| cookies.get(name).cloned())
    }

    fn set(&self, attributes: &CookieAttributes, value: &str) {
        if let Ok(mut cookies) = self.cookies.lock() {
            cookies.insert(attributes.name.clone(), value.to_string());
        }
    }

    fn remove(&self, attributes: &CookieAttributes) {
        if let Ok(mut cookies) = self.cookies.lock() {
            cookies.remove(&attributes.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCookieStore::new();
        let attributes = CookieAttributes::default();

        assert!(store.get(&attributes.name).is_none());

        store.set(&attributes, "value");
        assert_eq!(store.get(&attributes.name).as_deref(), Some("value"));

        store.remove(&attributes);
        assert!(store.get(&attributes.name).is_none());
    }

    #[test]
    fn test_clone_shares_state() {
        let store = MemoryCookieStore::new();
        let handle = store.clone();
        let attributes = CookieAttributes::default();

        store.set(&attributes, "shared");
        assert_eq!(handle.get(&attributes.name).as_deref(), Some("shared"));
    }

    #[test]
    fn test_same_site_serialization_matches_wire_format() {
        assert_eq!(serde_json::to_string(&SameSite::Strict).unwrap(), "\"Strict\"");
        assert_eq!(serde_json::to_string(&SameSite::Lax).unwrap(), "\"Lax\"");
        assert_eq!(serde_json::to_string(&SameSite::None).unwrap(), "\"None\"");
    }

    #[test]
    fn test_default_attributes() {
        let attributes = CookieAttributes::default();
        assert_eq!(attributes.name, "ns-cookie-consent");
        assert_eq!(attributes.expiry_days, 365);
        assert_eq!(attributes.path, "/");
        assert_eq!(attributes.same_site, SameSite::Lax);
    }
}
