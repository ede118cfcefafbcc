// consent-widget/src/consent/manager.rs

use crate::config::CategoryDefinition;
use crate::consent::events::{ConsentEvent, ConsentObserver};
use crate::consent::record::{ConsentRecord, ESSENTIAL_CATEGORY};
use crate::cookie::{CookieAttributes, CookieStore};
use crate::sink::SideEffectSink;
use crate::storage::PreferenceStorage;
use std::collections::BTreeMap;

/// 同意状態機械の状態
///
/// Decidedは明示的なreset()まで終端。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentState {
    Uninitialized,
    NoConsent,
    BannerVisible,
    ModalVisible,
    Decided,
}

/// 状態機械の動作設定
#[derive(Debug, Clone)]
pub struct ConsentManagerOptions {
    /// boot時に同意がなければ自動でバナーを表示する
    pub auto_show: bool,
    /// スクロール深度（%）によるバナー表示トリガー
    pub scroll_show_percent: Option<u8>,
    /// 新規レコードに刻むスキーマバージョン
    pub version: String,
    pub cookie: CookieAttributes,
    /// クライアント側ストレージに書く設定ブロブのキー
    pub storage_key: String,
}

impl Default for ConsentManagerOptions {
    fn default() -> Self {
        Self {
            auto_show: true,
            scroll_show_percent: None,
            version: "1.0".to_string(),
            cookie: CookieAttributes::default(),
            storage_key: "ns-cookie-preferences".to_string(),
        }
    }
}

/// 同意状態機械
///
/// Uninitialized → NoConsent → BannerVisible → (ModalVisible | Decided) → Decided
///
/// UIイベントは単一スレッドで逐次発火する前提のため、遷移は&mut selfで直列。
pub struct ConsentManager {
    state: ConsentState,
    record: Option<ConsentRecord>,
    categories: Vec<CategoryDefinition>,
    options: ConsentManagerOptions,
    cookies: Box<dyn CookieStore>,
    storage: Box<dyn PreferenceStorage>,
    sink: Box<dyn SideEffectSink>,
    observers: Vec<Box<dyn ConsentObserver>>,
    scroll_triggered: bool,
}

impl ConsentManager {
    pub fn new(
        categories: Vec<CategoryDefinition>,
        options: ConsentManagerOptions,
        cookies: Box<dyn CookieStore>,
        storage: Box<dyn PreferenceStorage>,
        sink: Box<dyn SideEffectSink>,
    ) -> Self {
        Self {
            state: ConsentState::Uninitialized,
            record: None,
            categories,
            options,
            cookies,
            storage,
            sink,
            observers: Vec::new(),
            scroll_triggered: false,
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn ConsentObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> ConsentState {
        self.state
    }

    pub fn record(&self) -> Option<&ConsentRecord> {
        self.record.as_ref()
    }

    /// 起動処理
    ///
    /// 保存済みの同意が構造的に有効ならそのままDecidedへ遷移して副作用を適用する。
    /// 壊れた値は「同意なし」として扱い、バナーを再表示する（エラーにしない）。
    pub fn boot(&mut self) {
        self.scroll_triggered = false;

        let stored = self
            .cookies
            .get(&self.options.cookie.name)
            .and_then(|raw| ConsentRecord::from_cookie_value(&raw));

        match stored {
            Some(record) => {
                self.apply_side_effects(&record);
                self.record = Some(record);
                self.state = ConsentState::Decided;
            }
            None => {
                self.record = None;
                self.state = ConsentState::NoConsent;
                if self.options.auto_show {
                    self.show();
                }
                // auto_showでなければshow()かスクロールトリガーを待つ
            }
        }
    }

    /// バナーを表示する
    pub fn show(&mut self) {
        if self.state != ConsentState::NoConsent {
            return;
        }
        self.state = ConsentState::BannerVisible;
        self.emit(&ConsentEvent::BannerShown);
    }

    /// スクロール深度の通知（設定された閾値を初めて超えたときだけ表示する）
    pub fn on_scroll(&mut self, depth_percent: u8) {
        let Some(threshold) = self.options.scroll_show_percent else {
            return;
        };
        if self.scroll_triggered || self.state != ConsentState::NoConsent {
            return;
        }
        if depth_percent >= threshold {
            self.scroll_triggered = true;
            self.show();
        }
    }

    /// すべてのカテゴリに同意する
    pub fn accept_all(&mut self) {
        if self.state == ConsentState::Decided {
            return;
        }
        let record = ConsentRecord::accept_all(&self.options.version, &self.categories);
        self.decide(record.clone());
        self.emit(&ConsentEvent::AcceptedAll(record));
    }

    /// 必須カテゴリ以外を拒否する
    pub fn reject_all(&mut self) {
        if self.state == ConsentState::Decided {
            return;
        }
        let record = ConsentRecord::reject_all(&self.options.version, &self.categories);
        self.decide(record.clone());
        self.emit(&ConsentEvent::RejectedAll(record));
    }

    /// カスタマイズモーダルを開く
    ///
    /// トグルの初期値を返す。前回のレコードがあればそこから、なければ
    /// 各カテゴリのrequiredフラグから種を取る。
    pub fn open_customize(&mut self) -> Option<BTreeMap<String, bool>> {
        if self.state != ConsentState::BannerVisible {
            return None;
        }
        self.state = ConsentState::ModalVisible;
        self.emit(&ConsentEvent::ModalOpened);
        Some(self.toggle_seeds())
    }

    /// カテゴリトグルの初期値
    pub fn toggle_seeds(&self) -> BTreeMap<String, bool> {
        self.categories
            .iter()
            .map(|definition| {
                let granted = match &self.record {
                    Some(record) => record.is_granted(&definition.name),
                    None => definition.required,
                };
                (definition.name.clone(), granted)
            })
            .collect()
    }

    /// カスタム選択を保存する
    ///
    /// essentialは入力に関わらず強制的にtrue。
    pub fn save_preferences(&mut self, selections: &BTreeMap<String, bool>) {
        if self.state == ConsentState::Decided {
            return;
        }

        // 定義済みカテゴリをすべて埋める（未指定はrequiredフラグに従う）
        let mut categories: BTreeMap<String, bool> = self
            .categories
            .iter()
            .map(|definition| {
                let granted = selections
                    .get(&definition.name)
                    .copied()
                    .unwrap_or(definition.required);
                (definition.name.clone(), granted || definition.required)
            })
            .collect();
        categories.insert(ESSENTIAL_CATEGORY.to_string(), true);

        let record = ConsentRecord::new(&self.options.version, categories);
        self.decide(record.clone());
        self.emit(&ConsentEvent::PreferencesSaved(record));
    }

    /// 同意を撤回する
    ///
    /// クッキーと設定ブロブを消し、拒否シグナルを流してNoConsentに戻る。
    /// バナーの自動再表示はしない。
    pub fn withdraw(&mut self) {
        if self.state != ConsentState::Decided {
            return;
        }

        self.cookies.remove(&self.options.cookie);
        self.storage.remove(&self.options.storage_key);
        self.sink.notify_analytics(false);
        self.sink.notify_marketing(false);

        self.record = None;
        self.state = ConsentState::NoConsent;
        self.emit(&ConsentEvent::Withdrawn);
    }

    /// 状態機械を初期状態に戻す
    ///
    /// クッキーを削除し、メモリ上のレコードを破棄する。バナーは自動では
    /// 再表示されない（次のshow()またはboot()を待つ）。
    pub fn reset(&mut self) {
        self.cookies.remove(&self.options.cookie);
        self.storage.remove(&self.options.storage_key);
        self.record = None;
        self.state = ConsentState::NoConsent;
        self.scroll_triggered = false;
        self.emit(&ConsentEvent::Reset);
    }

    fn decide(&mut self, record: ConsentRecord) {
        self.cookies
            .set(&self.options.cookie, &record.to_cookie_value());
        self.apply_side_effects(&record);
        self.record = Some(record);
        self.state = ConsentState::Decided;
    }

    /// Decided遷移時の副作用
    ///
    /// 統合が無い場合もno-opアダプタが吸収するため、ここでは常に成功する。
    fn apply_side_effects(&self, record: &ConsentRecord) {
        self.sink.notify_analytics(record.is_granted("analytics"));
        self.sink.notify_marketing(record.is_granted("marketing"));
        self.storage
            .write(&self.options.storage_key, &record.to_cookie_value());
    }

    fn emit(&self, event: &ConsentEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
