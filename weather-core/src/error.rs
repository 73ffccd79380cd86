use thiserror::Error;

/// Errors returned by the OpenWeatherMap client.
///
/// Every message is prefixed with the provider name so callers juggling
/// several data sources can tell where a failure came from.
#[derive(Debug, Error)]
pub enum OwmError {
    /// Connection, DNS, timeout or body-read failure.
    #[error("open-weather-map: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with HTTP 401.
    #[error("open-weather-map: invalid api key")]
    InvalidApiKey,

    /// The body was not valid JSON for the expected schema.
    #[error("open-weather-map: {0}")]
    Decode(#[from] serde_json::Error),

    /// An entry carried no weather condition to classify it with.
    #[error("open-weather-map: unexpected empty response (no weather conditions for dt={dt})")]
    EmptyConditions { dt: i64 },

    #[error("open-weather-map: timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

pub type Result<T> = std::result::Result<T, OwmError>;
