// consent-widget/src/geo.rs

use crate::error::GeoError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// EU加盟国の国コード（静的集合）
pub const EU_COUNTRIES: [&str; 27] = [
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

/// 地域区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    EuropeanUnion,
    UnitedKingdom,
    California,
    Rest,
}

/// 同意方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentMode {
    OptIn,
    OptOut,
}

/// バナーの詳細度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerVerbosity {
    Full,
    Minimal,
}

/// 地域ごとの同意ポリシー
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPolicy {
    pub region: Region,
    pub requires_consent: bool,
    pub consent_mode: ConsentMode,
    pub laws: &'static [&'static str],
    pub verbosity: BannerVerbosity,
}

/// ジオロケーション参照の結果
///
/// カリフォルニア判定には国コードだけでは足りないため、州・地域コードも運ぶ。
#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    pub country_code: String,
    #[serde(default)]
    pub region_code: Option<String>,
}

/// 参照失敗時に使うフォールバックポリシー
pub fn fallback_policy() -> RegionPolicy {
    RegionPolicy {
        region: Region::Rest,
        requires_consent: false,
        consent_mode: ConsentMode::OptOut,
        laws: &[],
        verbosity: BannerVerbosity::Minimal,
    }
}

/// 国コードから地域ポリシーを解決する
///
/// EU集合の判定が単一国の地域より先に短絡する。
pub fn resolve_policy(location: &GeoLocation) -> RegionPolicy {
    let country = location.country_code.trim().to_uppercase();

    if EU_COUNTRIES.contains(&country.as_str()) {
        return RegionPolicy {
            region: Region::EuropeanUnion,
            requires_consent: true,
            consent_mode: ConsentMode::OptIn,
            laws: &["GDPR", "ePrivacy"],
            verbosity: BannerVerbosity::Full,
        };
    }

    if country == "GB" {
        return RegionPolicy {
            region: Region::UnitedKingdom,
            requires_consent: true,
            consent_mode: ConsentMode::OptIn,
            laws: &["UK-GDPR", "PECR"],
            verbosity: BannerVerbosity::Full,
        };
    }

    // カリフォルニア州（米国のみ。"CA"単体はカナダなのでフォールバック扱い）
    let region_code = location
        .region_code
        .as_deref()
        .map(|code| code.trim().to_uppercase());
    if country == "US" && region_code.as_deref() == Some("CA") {
        return RegionPolicy {
            region: Region::California,
            requires_consent: true,
            consent_mode: ConsentMode::OptOut,
            laws: &["CCPA", "CPRA"],
            verbosity: BannerVerbosity::Full,
        };
    }

    fallback_policy()
}

/// IPジオロケーション参照の差し替え点
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn locate(&self) -> Result<GeoLocation, GeoError>;
}

/// 外部のジオロケーションAPIを叩く実装
pub struct HttpGeoLookup {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGeoLookup {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl GeoLookup for HttpGeoLookup {
    async fn locate(&self) -> Result<GeoLocation, GeoError> {
        let response = self.client.get(&self.endpoint).send().await?;
        if !response.status().is_success() {
            return Err(GeoError::MalformedResponse);
        }
        response
            .json::<GeoLocation>()
            .await
            .map_err(|_| GeoError::MalformedResponse)
    }
}

/// 地域ポリシーを解決する
///
/// 参照失敗（ネットワークエラー・不正なレスポンス）はフォールバック地域に
/// 落ちる。呼び出し側にエラーは伝播しない。
pub async fn resolve_region(lookup: &dyn GeoLookup) -> RegionPolicy {
    match lookup.locate().await {
        Ok(location) => resolve_policy(&location),
        Err(error) => {
            tracing::debug!(error = %error, "Geolocation lookup failed, using fallback region");
            fallback_policy()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(country: &str, region: Option<&str>) -> GeoLocation {
        GeoLocation {
            country_code: country.to_string(),
            region_code: region.map(|code| code.to_string()),
        }
    }

    #[test]
    fn test_eu_member_is_opt_in() {
        let policy = resolve_policy(&location("DE", None));
        assert_eq!(policy.region, Region::EuropeanUnion);
        assert!(policy.requires_consent);
        assert_eq!(policy.consent_mode, ConsentMode::OptIn);
        assert!(policy.laws.contains(&"GDPR"));
    }

    #[test]
    fn test_eu_check_short_circuits_before_single_country_regions() {
        // フランスはEUとして解決される（後続の単一国判定に到達しない）
        let policy = resolve_policy(&location("fr", None));
        assert_eq!(policy.region, Region::EuropeanUnion);
    }

    #[test]
    fn test_united_kingdom() {
        let policy = resolve_policy(&location("GB", None));
        assert_eq!(policy.region, Region::UnitedKingdom);
        assert!(policy.laws.contains(&"UK-GDPR"));
    }

    #[test]
    fn test_california_requires_us_and_state_code() {
        let policy = resolve_policy(&location("US", Some("CA")));
        assert_eq!(policy.region, Region::California);
        assert_eq!(policy.consent_mode, ConsentMode::OptOut);

        // カナダの"CA"はカリフォルニアではない
        let policy = resolve_policy(&location("CA", None));
        assert_eq!(policy.region, Region::Rest);

        // 他州の米国もフォールバック
        let policy = resolve_policy(&location("US", Some("NY")));
        assert_eq!(policy.region, Region::Rest);
    }

    #[test]
    fn test_unknown_country_falls_back() {
        let policy = resolve_policy(&location("JP", None));
        assert_eq!(policy.region, Region::Rest);
        assert!(!policy.requires_consent);
    }

    struct FailingLookup;

    #[async_trait]
    impl GeoLookup for FailingLookup {
        async fn locate(&self) -> Result<GeoLocation, GeoError> {
            Err(GeoError::MalformedResponse)
        }
    }

    struct FixedLookup(GeoLocation);

    #[async_trait]
    impl GeoLookup for FixedLookup {
        async fn locate(&self) -> Result<GeoLocation, GeoError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_yields_fallback() {
        let policy = resolve_region(&FailingLookup).await;
        assert_eq!(policy.region, Region::Rest);
    }

    #[tokio::test]
    async fn test_lookup_success_resolves_policy() {
        let policy = resolve_region(&FixedLookup(location("IT", None))).await;
        assert_eq!(policy.region, Region::EuropeanUnion);
    }
}
