use thiserror::Error;

/// Everything that can go wrong while looking up the weather for a city.
///
/// Demo mode never produces an error; only the live provider and query
/// validation do.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request never got a response (DNS, refused connection, TLS, ...).
    #[error("Network error while contacting the weather API: {0}")]
    Network(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Weather API error ({status}): {}", truncate_body(.body))]
    Provider { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("Failed to parse weather API response: {0}")]
    Parse(#[source] serde_json::Error),

    /// Returned by [`WeatherQuery::parse`](crate::WeatherQuery::parse).
    #[error("City name must not be empty")]
    EmptyCity,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
