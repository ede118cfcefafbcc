// consent-widget/src/error.rs

use thiserror::Error;

/// 設定取得のエラー
///
/// 呼び出し側には伝播させない。ローダーが既定値へのフォールバックに使う。
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("malformed response body")]
    MalformedBody,
}

/// ジオロケーション参照のエラー
///
/// こちらも呼び出し側には伝播しない。フォールバック地域の選択に使う。
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed geolocation response")]
    MalformedResponse,
}
