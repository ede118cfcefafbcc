// consent-widget/src/sink.rs

use std::sync::{Arc, Mutex};

/// サードパーティ統合への副作用通知の差し替え点
///
/// gtag / fbq / dataLayer のようなグローバルへの散在した存在チェックの代わりに、
/// 統合ごとのアダプタでこのトレイトを実装する。統合が無いホストではno-op。
pub trait SideEffectSink: Send + Sync {
    fn notify_analytics(&self, granted: bool);
    fn notify_marketing(&self, granted: bool);
}

/// 統合が存在しないホスト用のno-op実装（呼び出しは常に成功する）
#[derive(Clone, Copy, Default)]
pub struct NoopSink;

impl SideEffectSink for NoopSink {
    fn notify_analytics(&self, _granted: bool) {}
    fn notify_marketing(&self, _granted: bool) {}
}

/// 通知履歴を記録する実装（テスト・デバッグ用）
#[derive(Clone, Default)]
pub struct RecordingSink {
    signals: Arc<Mutex<Vec<(String, bool)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<(String, bool)> {
        self.signals
            .lock()
            .map(|signals| signals.clone())
            .unwrap_or_default()
    }
}

impl SideEffectSink for RecordingSink {
    fn notify_analytics(&self, granted: bool) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push(("analytics".to_string(), granted));
        }
    }

    fn notify_marketing(&self, granted: bool) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push(("marketing".to_string(), granted));
        }
    }
}
