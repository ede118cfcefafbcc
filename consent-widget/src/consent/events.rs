// consent-widget/src/consent/events.rs

use crate::consent::record::ConsentRecord;
use std::sync::{Arc, Mutex};

/// 同意ライフサイクルのイベント
///
/// onAccept/onReject/onSaveのような任意コールバックのフィールドではなく、
/// 購読者リストへのイベント発行として表現する。
#[derive(Debug, Clone, PartialEq)]
pub enum ConsentEvent {
    BannerShown,
    ModalOpened,
    AcceptedAll(ConsentRecord),
    RejectedAll(ConsentRecord),
    PreferencesSaved(ConsentRecord),
    Withdrawn,
    Reset,
}

/// イベント購読者
pub trait ConsentObserver: Send + Sync {
    fn on_event(&self, event: &ConsentEvent);
}

/// イベント履歴を記録する購読者（テスト・デバッグ用）
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ConsentEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConsentEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ConsentObserver for RecordingObserver {
    fn on_event(&self, event: &ConsentEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
