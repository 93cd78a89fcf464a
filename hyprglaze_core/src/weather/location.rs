//! Device position and reverse geocoding

use super::{Location, LocationProvider, Position};
use crate::error::{CoreError, GeolocationError, Result};
use crate::preferences::PreferenceStore;
use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

const FALLBACK_CITY: &str = "Current location";
const FALLBACK_COUNTRY: &str = "Unknown";
const UNKNOWN_CITY: &str = "Unknown city";

static ADMIN_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"市$|区$|县$|省$").unwrap());

#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn position(&self) -> std::result::Result<Position, GeolocationError>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, position: Position) -> Result<Location>;
}

/// Position taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn position(&self) -> std::result::Result<Position, GeolocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate position from the public IP address
pub struct IpGeolocation {
    client: reqwest::Client,
    url: String,
}

impl IpGeolocation {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PositionSource for IpGeolocation {
    async fn position(&self) -> std::result::Result<Position, GeolocationError> {
        let classify = |e: reqwest::Error| {
            warn!("IP geolocation request failed: {}", e);
            if e.is_timeout() {
                GeolocationError::Timeout
            } else {
                GeolocationError::PositionUnavailable
            }
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(classify)?;
        let body: IpApiResponse = response.json().await.map_err(classify)?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(latitude), Some(longitude)) => Ok(Position {
                latitude,
                longitude,
            }),
            (status, _, _) => {
                warn!("IP geolocation returned status {:?}", status);
                Err(GeolocationError::PositionUnavailable)
            }
        }
    }
}

/// Reuses a fix while it is younger than `max_age`
pub struct CachedPosition<S> {
    inner: S,
    max_age: Duration,
    last: Mutex<Option<(Instant, Position)>>,
}

impl<S: PositionSource> CachedPosition<S> {
    pub fn new(inner: S, max_age: Duration) -> Self {
        Self {
            inner,
            max_age,
            last: Mutex::new(None),
        }
    }

    fn fresh(&self) -> Option<Position> {
        let last = self.last.lock().ok()?;
        last.filter(|(at, _)| at.elapsed() < self.max_age)
            .map(|(_, position)| position)
    }
}

#[async_trait]
impl<S: PositionSource> PositionSource for CachedPosition<S> {
    async fn position(&self) -> std::result::Result<Position, GeolocationError> {
        if let Some(position) = self.fresh() {
            debug!("Using cached position fix");
            return Ok(position);
        }
        let position = self.inner.position().await?;
        if let Ok(mut last) = self.last.lock() {
            *last = Some((Instant::now(), position));
        }
        Ok(position)
    }
}

pub struct BigDataCloudGeocoder {
    client: reqwest::Client,
    url: String,
}

impl BigDataCloudGeocoder {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ReverseGeocoder for BigDataCloudGeocoder {
    async fn reverse(&self, position: Position) -> Result<Location> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("latitude", position.latitude.to_string()),
                ("longitude", position.longitude.to_string()),
                ("localityLanguage", "zh".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::network(format!(
                "Reverse geocoding request failed: {}",
                status.as_u16()
            )));
        }

        let body: Value = response.json().await?;
        if !body.is_object() {
            return Err(CoreError::network("Reverse geocoding returned malformed data"));
        }
        Ok(parse_geocode_payload(position, &body))
    }
}

/// Pick the most specific place name from a reverse geocoding response
pub fn parse_geocode_payload(position: Position, body: &Value) -> Location {
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    let city = ["city", "locality", "principalSubdivision", "countryName"]
        .into_iter()
        .find_map(|name| field(name))
        .unwrap_or(UNKNOWN_CITY);
    let country = field("countryName").unwrap_or(FALLBACK_COUNTRY);

    Location {
        latitude: position.latitude,
        longitude: position.longitude,
        city: ADMIN_SUFFIX.replace(city, "").into_owned(),
        country: country.to_string(),
    }
}

/// Position source plus geocoder, gated by the geolocation preference
pub struct Geolocator {
    source: Box<dyn PositionSource>,
    geocoder: Box<dyn ReverseGeocoder>,
    timeout: Duration,
    preferences: Option<Arc<PreferenceStore>>,
}

impl Geolocator {
    pub fn new(
        source: Box<dyn PositionSource>,
        geocoder: Box<dyn ReverseGeocoder>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            geocoder,
            timeout,
            preferences: None,
        }
    }

    /// Deny lookups while `weather.enableGeolocation` is off
    pub fn with_preferences(mut self, preferences: Arc<PreferenceStore>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    fn enabled(&self) -> bool {
        self.preferences
            .as_ref()
            .map(|p| p.get().weather.enable_geolocation)
            .unwrap_or(true)
    }
}

#[async_trait]
impl LocationProvider for Geolocator {
    async fn locate(&self) -> Result<Location> {
        if !self.enabled() {
            return Err(GeolocationError::PermissionDenied.into());
        }

        let position = tokio::time::timeout(self.timeout, self.source.position())
            .await
            .map_err(|_| GeolocationError::Timeout)??;

        match self.geocoder.reverse(position).await {
            Ok(location) => Ok(location),
            Err(e) => {
                warn!("Reverse geocoding failed: {}", e);
                Ok(Location {
                    latitude: position.latitude,
                    longitude: position.longitude,
                    city: FALLBACK_CITY.to_string(),
                    country: FALLBACK_COUNTRY.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{MemoryStorage, PreferencesPatch, WeatherPatch};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BERLIN: Position = Position {
        latitude: 52.52,
        longitude: 13.405,
    };

    struct FailingGeocoder;

    #[async_trait]
    impl ReverseGeocoder for FailingGeocoder {
        async fn reverse(&self, _: Position) -> Result<Location> {
            Err(CoreError::network("offline"))
        }
    }

    struct StalledSource;

    #[async_trait]
    impl PositionSource for StalledSource {
        async fn position(&self) -> std::result::Result<Position, GeolocationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(BERLIN)
        }
    }

    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl PositionSource for CountingSource {
        async fn position(&self) -> std::result::Result<Position, GeolocationError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(BERLIN)
        }
    }

    #[test]
    fn geocode_prefers_city_and_strips_suffix() {
        let body = json!({
            "city": "深圳市",
            "locality": "南山区",
            "countryName": "中国"
        });
        let location = parse_geocode_payload(BERLIN, &body);
        assert_eq!(location.city, "深圳");
        assert_eq!(location.country, "中国");
    }

    #[test]
    fn geocode_falls_through_empty_fields() {
        let body = json!({ "city": "", "principalSubdivision": "广东省" });
        let location = parse_geocode_payload(BERLIN, &body);
        assert_eq!(location.city, "广东");
        assert_eq!(location.country, "Unknown");

        let location = parse_geocode_payload(BERLIN, &json!({}));
        assert_eq!(location.city, "Unknown city");
    }

    #[tokio::test]
    async fn geocoder_failure_degrades_to_placeholder() {
        let locator = Geolocator::new(
            Box::new(FixedPosition(BERLIN)),
            Box::new(FailingGeocoder),
            Duration::from_secs(10),
        );
        let location = locator.locate().await.unwrap();
        assert_eq!(location.city, "Current location");
        assert_eq!(location.country, "Unknown");
        assert_eq!(location.position(), BERLIN);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_position_source_times_out() {
        let locator = Geolocator::new(
            Box::new(StalledSource),
            Box::new(FailingGeocoder),
            Duration::from_secs(10),
        );
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Geolocation {
                source: GeolocationError::Timeout
            }
        ));
    }

    #[tokio::test]
    async fn disabled_geolocation_is_denied() {
        let prefs = Arc::new(PreferenceStore::new(Box::new(MemoryStorage::new())));
        prefs.update(&PreferencesPatch::weather(WeatherPatch {
            enable_geolocation: Some(false),
            ..Default::default()
        }));

        let locator = Geolocator::new(
            Box::new(FixedPosition(BERLIN)),
            Box::new(FailingGeocoder),
            Duration::from_secs(10),
        )
        .with_preferences(prefs);

        let err = locator.locate().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Geolocation {
                source: GeolocationError::PermissionDenied
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn cached_fix_expires_after_max_age() {
        let cached =
            CachedPosition::new(CountingSource(AtomicUsize::new(0)), Duration::from_secs(600));

        cached.position().await.unwrap();
        cached.position().await.unwrap();
        assert_eq!(cached.inner.0.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(601)).await;
        cached.position().await.unwrap();
        assert_eq!(cached.inner.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn geocoder_asks_for_chinese_names_and_strips_suffix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("latitude", "52.52"))
            .and(query_param("longitude", "13.405"))
            .and(query_param("localityLanguage", "zh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "city": "深圳市", "countryName": "中国" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let geocoder =
            BigDataCloudGeocoder::new(reqwest::Client::new(), format!("{}/reverse", server.uri()));
        let location = geocoder.reverse(BERLIN).await.unwrap();
        assert_eq!(location.city, "深圳");
        assert_eq!(location.country, "中国");
    }

    #[tokio::test]
    async fn geocoder_error_status_falls_back_to_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = format!("{}/reverse", server.uri());
        let geocoder = BigDataCloudGeocoder::new(reqwest::Client::new(), url.clone());
        assert!(matches!(
            geocoder.reverse(BERLIN).await,
            Err(CoreError::Network { .. })
        ));

        let locator = Geolocator::new(
            Box::new(FixedPosition(BERLIN)),
            Box::new(BigDataCloudGeocoder::new(reqwest::Client::new(), url)),
            Duration::from_secs(10),
        );
        let location = locator.locate().await.unwrap();
        assert_eq!(location.city, "Current location");
        assert_eq!(location.country, "Unknown");
    }

    #[tokio::test]
    async fn ip_lookup_maps_failed_status_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "fail", "message": "reserved range" })),
            )
            .mount(&server)
            .await;

        let source = IpGeolocation::new(reqwest::Client::new(), format!("{}/json", server.uri()));
        assert_eq!(
            source.position().await,
            Err(GeolocationError::PositionUnavailable)
        );
    }

    #[tokio::test]
    async fn ip_lookup_returns_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "status": "success", "lat": 52.52, "lon": 13.405 }),
            ))
            .mount(&server)
            .await;

        let source = IpGeolocation::new(reqwest::Client::new(), format!("{}/json", server.uri()));
        assert_eq!(source.position().await, Ok(BERLIN));
    }
}
