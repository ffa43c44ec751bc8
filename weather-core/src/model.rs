use serde::{Deserialize, Serialize};

use crate::{WeatherError, icon::Glyph};

/// A validated city search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    /// Trim the raw input and reject it when nothing is left.
    pub fn parse(input: &str) -> Result<Self, WeatherError> {
        let city = input.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        Ok(Self {
            city: city.to_string(),
        })
    }
}

/// Normalized current conditions for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature_c: Option<i64>,
    pub humidity: Option<f64>,
    pub condition: String,
    pub icon: Glyph,
    pub is_demo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
