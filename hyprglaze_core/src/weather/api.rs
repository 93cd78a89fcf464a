use super::{Location, WeatherSnapshot, WeatherSource};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use chrono::Local;
use log::debug;
use serde_json::Value;

/// Client of the open-meteo forecast endpoint
pub struct OpenMeteoClient {
    client: reqwest::Client,
    url: String,
}

impl OpenMeteoClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch(&self, location: &Location) -> Result<WeatherSnapshot> {
        debug!(
            "Fetching weather for {:.2},{:.2}",
            location.latitude, location.longitude
        );
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", "temperature_2m,weather_code,is_day".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::weather_api(format!(
                "Weather request failed: {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CoreError::weather_api(format!("Malformed weather response: {}", e)))?;
        parse_weather_payload(&body, location)
    }
}

/// Validate a forecast response and build the snapshot
pub fn parse_weather_payload(body: &Value, location: &Location) -> Result<WeatherSnapshot> {
    let current = body
        .get("current")
        .filter(|c| c.is_object())
        .ok_or_else(|| CoreError::weather_api("Weather response has no current conditions"))?;

    let temperature = current
        .get("temperature_2m")
        .and_then(Value::as_f64)
        .filter(|t| t.is_finite())
        .ok_or_else(|| CoreError::weather_api("Weather response has an invalid temperature"))?;

    // WMO codes are whole numbers; `3.0` is accepted, `2.7` is not
    let weather_code = current
        .get("weather_code")
        .and_then(|c| {
            c.as_u64().or_else(|| {
                c.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
        })
        .and_then(|c| u32::try_from(c).ok())
        .ok_or_else(|| CoreError::weather_api("Weather response has an invalid weather code"))?;

    let is_day = current.get("is_day").and_then(Value::as_i64) == Some(1);

    Ok(WeatherSnapshot {
        temperature: temperature.round() as i32,
        weather_code,
        city: location.city.clone(),
        country: location.country.clone(),
        is_day,
        last_updated: Local::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn shenzhen() -> Location {
        Location {
            latitude: 22.54,
            longitude: 114.06,
            city: "深圳".to_string(),
            country: "中国".to_string(),
        }
    }

    #[test]
    fn temperature_is_rounded() {
        let body = json!({
            "current": { "temperature_2m": 21.6, "weather_code": 3, "is_day": 0 }
        });
        let snapshot = parse_weather_payload(&body, &shenzhen()).unwrap();
        assert_eq!(snapshot.temperature, 22);
        assert_eq!(snapshot.weather_code, 3);
        assert!(!snapshot.is_day);
        assert_eq!(snapshot.city, "深圳");
    }

    #[test]
    fn missing_temperature_is_rejected() {
        let body = json!({ "current": { "weather_code": 3, "is_day": 1 } });
        let err = parse_weather_payload(&body, &shenzhen()).unwrap_err();
        assert!(matches!(err, CoreError::WeatherApi { .. }));
    }

    #[test]
    fn non_numeric_code_is_rejected() {
        let body = json!({
            "current": { "temperature_2m": 10.0, "weather_code": "rain", "is_day": 1 }
        });
        assert!(parse_weather_payload(&body, &shenzhen()).is_err());
        assert!(parse_weather_payload(&json!({}), &shenzhen()).is_err());
    }

    #[test]
    fn fractional_or_out_of_range_codes_are_rejected() {
        let with_code = |code: Value| {
            json!({ "current": { "temperature_2m": 10.0, "weather_code": code, "is_day": 1 } })
        };
        for code in [json!(2.7), json!(-1), json!(5e10)] {
            let err = parse_weather_payload(&with_code(code.clone()), &shenzhen()).unwrap_err();
            assert!(matches!(err, CoreError::WeatherApi { .. }), "code {}", code);
        }
        let snapshot = parse_weather_payload(&with_code(json!(61.0)), &shenzhen()).unwrap();
        assert_eq!(snapshot.weather_code, 61);
    }

    #[tokio::test]
    async fn client_sends_expected_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("current", "temperature_2m,weather_code,is_day"))
            .and(query_param("forecast_days", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": { "temperature_2m": 28.2, "weather_code": 0, "is_day": 1 },
                "timezone": "Asia/Shanghai"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            OpenMeteoClient::new(reqwest::Client::new(), format!("{}/v1/forecast", server.uri()));
        let snapshot = client.fetch(&shenzhen()).await.unwrap();
        assert_eq!(snapshot.temperature, 28);
        assert!(snapshot.is_day);
        assert_eq!(snapshot.icon_name(), "sun");
    }

    #[tokio::test]
    async fn server_error_status_is_a_weather_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::new(reqwest::Client::new(), server.uri());
        let err = client.fetch(&shenzhen()).await.unwrap_err();
        assert!(err.to_string().contains("503"));
        assert!(matches!(err, CoreError::WeatherApi { .. }));
    }
}
