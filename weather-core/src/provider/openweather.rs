use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use serde_json::Value;
use tracing::debug;

use crate::{WeatherError, WeatherRecord, icon::resolve_icon};

use super::WeatherProvider;

/// Live provider speaking the OpenWeather `/weather` API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!("{base}/weather")
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        let url = self.endpoint();
        debug!(%url, city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(WeatherError::Network)?;

        let status = res.status();

        if !status.is_success() {
            let body = res
                .text()
                .await
                .ok()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

            return Err(WeatherError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let body = res.text().await.map_err(WeatherError::Network)?;
        let payload: Value = serde_json::from_str(&body).map_err(WeatherError::Parse)?;

        Ok(normalize(&payload, city))
    }
}

/// Map an OpenWeather payload onto a record, degrading missing or mistyped
/// fields instead of failing.
fn normalize(payload: &Value, requested_city: &str) -> WeatherRecord {
    let temperature_c = payload
        .pointer("/main/temp")
        .and_then(Value::as_f64)
        .map(round_half_up);
    let humidity = payload.pointer("/main/humidity").and_then(Value::as_f64);

    let condition = payload
        .pointer("/weather/0/main")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string();

    let icon_code = payload
        .pointer("/weather/0/icon")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let city = payload
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(requested_city)
        .to_string();

    WeatherRecord {
        icon: resolve_icon(icon_code, &condition),
        city,
        temperature_c,
        humidity,
        condition,
        is_demo: false,
        message: None,
    }
}

/// Halves round toward positive infinity: 21.5 -> 22, -2.5 -> -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
