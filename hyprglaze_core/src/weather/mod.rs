//! Current weather for the device location
//!
//! The pipeline is: position source -> reverse geocoder -> per-coordinate
//! cache -> forecast endpoint, all wrapped in the retry envelope by
//! [`WeatherService`]. [`WeatherRefresher`] drives it on a timer.

mod api;
mod cache;
pub mod codes;
mod location;
mod refresher;
mod service;

pub use api::{parse_weather_payload, OpenMeteoClient};
pub use cache::{cache_key, WeatherCache};
pub use location::{
    parse_geocode_payload, BigDataCloudGeocoder, CachedPosition, FixedPosition, Geolocator,
    IpGeolocation, PositionSource, ReverseGeocoder,
};
pub use refresher::{FetchState, WeatherRefresher, WeatherStatus};
pub use service::WeatherService;

use crate::error::Result;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_GEOCODE_URL: &str = "https://api-bdc.net/data/reverse-geocode-client";
pub const DEFAULT_IP_GEOLOCATION_URL: &str = "http://ip-api.com/json";

/// Result of one successful weather fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    /// Degrees Celsius, rounded
    pub temperature: i32,
    /// WMO weather interpretation code
    pub weather_code: u32,
    pub city: String,
    pub country: String,
    pub is_day: bool,
    pub last_updated: DateTime<Local>,
}

impl WeatherSnapshot {
    pub fn description(&self) -> &'static str {
        codes::description(self.weather_code)
    }

    pub fn icon_name(&self) -> &'static str {
        codes::icon_name(self.weather_code, self.is_day)
    }
}

/// Raw position fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// A position with its human-readable place name
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn position(&self) -> Position {
        Position {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn locate(&self) -> Result<Location>;
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, location: &Location) -> Result<WeatherSnapshot>;
}

/// Endpoints, timeouts and policies of the weather pipeline
#[derive(Debug, Clone)]
pub struct WeatherServiceConfig {
    pub forecast_url: String,
    pub geocode_url: String,
    pub ip_geolocation_url: String,
    pub request_timeout: Duration,
    pub geolocation_timeout: Duration,
    pub position_max_age: Duration,
    pub cache_ttl: Duration,
    /// Skip IP geolocation and always use this position
    pub fixed_position: Option<Position>,
    pub retry: RetryPolicy,
}

impl Default for WeatherServiceConfig {
    fn default() -> Self {
        Self {
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            ip_geolocation_url: DEFAULT_IP_GEOLOCATION_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            geolocation_timeout: Duration::from_secs(10),
            position_max_age: Duration::from_secs(10 * 60),
            cache_ttl: Duration::from_secs(30 * 60),
            fixed_position: None,
            retry: RetryPolicy::default(),
        }
    }
}
