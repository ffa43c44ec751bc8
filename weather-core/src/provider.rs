use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tracing::debug;

use crate::{
    Config, WeatherError, WeatherRecord,
    config::FetchMode,
    provider::{demo::DemoProvider, openweather::OpenWeatherProvider},
};

pub mod demo;
pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError>;
}

/// Construct the provider matching the configured fetch mode.
pub fn provider_from_config(config: &Config) -> Arc<dyn WeatherProvider> {
    let mode = config.fetch_mode();
    debug!(?mode, "resolved fetch mode");

    match mode {
        FetchMode::Demo(reason) => Arc::new(DemoProvider::new(reason)),
        FetchMode::Live => {
            Arc::new(OpenWeatherProvider::new(config.base_url.clone(), config.api_key.clone()))
        }
    }
}

/// Looks up current weather for a city, either live or from demo data.
///
/// The mode is fixed when the fetcher is built; it holds no other state, so a
/// single instance can serve any number of concurrent lookups.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    mode: FetchMode,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherFetcher {
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.fetch_mode(),
            provider: provider_from_config(config),
        }
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    pub async fn fetch_current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        self.provider.current_weather(city).await
    }
}

#[async_trait]
impl WeatherProvider for WeatherFetcher {
    async fn current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        self.fetch_current_weather(city).await
    }
}
