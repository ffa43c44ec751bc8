use async_trait::async_trait;
use std::time::Duration;

use crate::{WeatherError, WeatherRecord, config::DemoReason, icon::Glyph};

use super::WeatherProvider;

/// Simulated round-trip so loading states stay visible.
pub const DEMO_LATENCY: Duration = Duration::from_millis(600);

/// Serves a fixed illustrative record without any network access.
#[derive(Debug, Clone)]
pub struct DemoProvider {
    reason: DemoReason,
    latency: Duration,
}

impl DemoProvider {
    pub fn new(reason: DemoReason) -> Self {
        Self {
            reason,
            latency: DEMO_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn record(&self, city: &str) -> WeatherRecord {
        WeatherRecord {
            city: city.to_string(),
            temperature_c: Some(22),
            humidity: Some(58.0),
            condition: "Partly Cloudy".to_string(),
            icon: Glyph::PartlyCloudy,
            is_demo: true,
            message: Some(self.reason.message().to_string()),
        }
    }
}

#[async_trait]
impl WeatherProvider for DemoProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.record(city))
    }
}
