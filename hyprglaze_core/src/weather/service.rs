use super::{
    cache_key, BigDataCloudGeocoder, CachedPosition, FixedPosition, Geolocator, IpGeolocation,
    LocationProvider, OpenMeteoClient, PositionSource, WeatherCache, WeatherServiceConfig,
    WeatherSnapshot, WeatherSource,
};
use crate::error::{CoreError, Result};
use crate::preferences::PreferenceStore;
use crate::retry::{with_retry, RetryPolicy};
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Weather for the current location with caching and retries
pub struct WeatherService {
    locator: Arc<dyn LocationProvider>,
    source: Arc<dyn WeatherSource>,
    cache: Mutex<WeatherCache>,
    retry: RetryPolicy,
}

impl WeatherService {
    pub fn new(
        locator: Arc<dyn LocationProvider>,
        source: Arc<dyn WeatherSource>,
        cache_ttl: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            locator,
            source,
            cache: Mutex::new(WeatherCache::new(cache_ttl)),
            retry,
        }
    }

    /// Wire up the HTTP-backed pipeline described by `config`
    pub fn from_config(
        config: &WeatherServiceConfig,
        preferences: Option<Arc<PreferenceStore>>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CoreError::config(format!("Failed to build HTTP client: {}", e)))?;

        let source: Box<dyn PositionSource> = match config.fixed_position {
            Some(position) => {
                info!(
                    "Using fixed position {:.2},{:.2}",
                    position.latitude, position.longitude
                );
                Box::new(FixedPosition(position))
            }
            None => Box::new(CachedPosition::new(
                IpGeolocation::new(client.clone(), config.ip_geolocation_url.clone()),
                config.position_max_age,
            )),
        };

        let mut locator = Geolocator::new(
            source,
            Box::new(BigDataCloudGeocoder::new(
                client.clone(),
                config.geocode_url.clone(),
            )),
            config.geolocation_timeout,
        );
        if let Some(preferences) = preferences {
            locator = locator.with_preferences(preferences);
        }

        Ok(Self::new(
            Arc::new(locator),
            Arc::new(OpenMeteoClient::new(client, config.forecast_url.clone())),
            config.cache_ttl,
            config.retry,
        ))
    }

    fn cache(&self) -> MutexGuard<'_, WeatherCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current weather; only the last failed attempt is returned
    pub async fn current_weather(&self) -> Result<WeatherSnapshot> {
        with_retry(&self.retry, || self.fetch_once()).await
    }

    async fn fetch_once(&self) -> Result<WeatherSnapshot> {
        let location = self.locator.locate().await?;
        let key = cache_key(location.latitude, location.longitude);

        let cached = self.cache().get(&key);
        if let Some(cached) = cached {
            debug!("Weather cache hit for {}", key);
            return Ok(cached);
        }

        let snapshot = self.source.fetch(&location).await?;
        self.cache().insert(key, snapshot.clone());
        info!(
            "Weather updated: {}°C, code {} in {}",
            snapshot.temperature, snapshot.weather_code, snapshot.city
        );
        Ok(snapshot)
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
        info!("Weather cache cleared");
    }

    pub fn cache_size(&self) -> usize {
        self.cache().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeolocationError;
    use crate::weather::{Location, Position};
    use async_trait::async_trait;
    use chrono::Local;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Here;

    #[async_trait]
    impl LocationProvider for Here {
        async fn locate(&self) -> Result<Location> {
            Ok(Location {
                latitude: 48.8566,
                longitude: 2.3522,
                city: "Paris".to_string(),
                country: "France".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        failures_before_success: usize,
    }

    #[async_trait]
    impl WeatherSource for CountingSource {
        async fn fetch(&self, location: &Location) -> Result<WeatherSnapshot> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures_before_success {
                return Err(CoreError::network("connection reset"));
            }
            Ok(WeatherSnapshot {
                temperature: 18,
                weather_code: 2,
                city: location.city.clone(),
                country: location.country.clone(),
                is_day: true,
                last_updated: Local::now(),
            })
        }
    }

    struct Denied;

    #[async_trait]
    impl LocationProvider for Denied {
        async fn locate(&self) -> Result<Location> {
            Err(GeolocationError::PermissionDenied.into())
        }
    }

    fn service_with(source: Arc<CountingSource>) -> WeatherService {
        WeatherService::new(
            Arc::new(Here),
            source,
            Duration::from_secs(30 * 60),
            RetryPolicy::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn second_fetch_within_ttl_hits_cache() {
        let source = Arc::new(CountingSource::default());
        let service = service_with(source.clone());

        service.current_weather().await.unwrap();
        service.current_weather().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.cache_size(), 1);

        tokio::time::advance(Duration::from_secs(30 * 60 + 1)).await;
        service.current_weather().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_with_backoff() {
        let source = Arc::new(CountingSource {
            failures_before_success: 2,
            ..Default::default()
        });
        let service = service_with(source.clone());

        let start = tokio::time::Instant::now();
        let snapshot = service.current_weather().await.unwrap();
        assert_eq!(snapshot.city, "Paris");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn geolocation_errors_surface_after_retries() {
        let service = WeatherService::new(
            Arc::new(Denied),
            Arc::new(CountingSource::default()),
            Duration::from_secs(60),
            RetryPolicy::default(),
        );
        let err = service.current_weather().await.unwrap_err();
        assert!(matches!(err, CoreError::Geolocation { .. }));
        assert_eq!(service.cache_size(), 0);
    }

    #[tokio::test]
    async fn clear_cache_forces_refetch() {
        let source = Arc::new(CountingSource::default());
        let service = service_with(source.clone());
        service.current_weather().await.unwrap();
        service.clear_cache();
        assert_eq!(service.cache_size(), 0);
        service.current_weather().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_temperature_leaves_cache_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": { "weather_code": 1, "is_day": 1 }
            })))
            .expect(2)
            .mount(&server)
            .await;

        let config = WeatherServiceConfig {
            forecast_url: format!("{}/forecast", server.uri()),
            geocode_url: format!("{}/geocode", server.uri()),
            fixed_position: Some(Position {
                latitude: 40.71,
                longitude: -74.0,
            }),
            retry: RetryPolicy {
                max_attempts: 2,
                initial_delay: Duration::from_millis(10),
                backoff: false,
            },
            ..Default::default()
        };
        let service = WeatherService::from_config(&config, None).unwrap();

        let err = service.current_weather().await.unwrap_err();
        assert!(matches!(err, CoreError::WeatherApi { .. }));
        assert_eq!(service.cache_size(), 0);
    }
}
