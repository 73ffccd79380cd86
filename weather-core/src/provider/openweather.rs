use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::{
    config::{Config, Location},
    error::{OwmError, Result},
    model::Weather,
};

use super::unix_to_utc;

const CURRENT_ENDPOINT: &str = "weather";
const FORECAST_ENDPOINT: &str = "onecall";
const UNITS: &str = "metric";

/// Client for the OpenWeatherMap REST API, bound to a single location.
#[derive(Clone)]
pub struct OpenWeatherMap {
    key: String,
    secret: String,
    location: Location,
    base_url: String,
    http: Client,
}

impl OpenWeatherMap {
    /// Copy credentials and location out of `config` and build the HTTP client.
    ///
    /// The config is not validated; bad credentials or coordinates surface as
    /// errors from the provider on the first request.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            key: config.key.clone(),
            secret: config.secret.clone(),
            location: config.location.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Fetch the weather currently observed at the client's location.
    #[instrument(skip(self), fields(location = %self.location.name))]
    pub async fn get_current(&self) -> Result<Weather> {
        let raw: OwmCurrentResponse = self.fetch(CURRENT_ENDPOINT, &self.current_query()).await?;
        map_current(raw)
    }

    /// Fetch the hourly forecast, one record per hour in provider order.
    #[instrument(skip(self), fields(location = %self.location.name))]
    pub async fn get_forecast(&self) -> Result<Vec<Weather>> {
        let raw: OwmForecastResponse =
            self.fetch(FORECAST_ENDPOINT, &self.forecast_query()).await?;
        map_forecast(raw)
    }

    // The current-weather endpoint has always been queried with latitude in
    // both coordinate slots; kept as-is until the upstream behaviour is confirmed.
    fn current_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lat", format!("{:.3}", self.location.lat)),
            ("lon", format!("{:.3}", self.location.lat)),
            ("appid", self.secret.clone()),
            ("units", UNITS.to_string()),
        ]
    }

    fn forecast_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lat", format!("{:.3}", self.location.lat)),
            ("lon", format!("{:.3}", self.location.lon)),
            ("appid", self.secret.clone()),
            ("units", UNITS.to_string()),
        ]
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!(
            url = %url,
            lat = self.location.lat,
            lon = self.location.lon,
            "Requesting OpenWeatherMap"
        );

        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(OwmError::InvalidApiKey);
        }

        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "OpenWeatherMap responded");

        Ok(serde_json::from_str(&body)?)
    }
}

impl std::fmt::Debug for OpenWeatherMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMap")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("location", &self.location)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn map_current(raw: OwmCurrentResponse) -> Result<Weather> {
    let condition = first_condition(raw.weather, raw.dt)?;

    Ok(Weather {
        kind: condition.main,
        description: condition.description,
        timezone: None,
        date_time: unix_to_utc(raw.dt)?,
        temp: raw.main.temp,
        temp_feeling: raw.main.feels_like,
        temp_min: raw.main.temp_min,
        temp_max: raw.main.temp_max,
        humidity: raw.main.humidity,
    })
}

fn map_forecast(raw: OwmForecastResponse) -> Result<Vec<Weather>> {
    let OwmForecastResponse { timezone, hourly, .. } = raw;

    hourly
        .into_iter()
        .map(|entry| -> Result<Weather> {
            let condition = first_condition(entry.weather, entry.dt)?;

            Ok(Weather {
                kind: condition.main,
                description: condition.description,
                timezone: timezone.clone(),
                date_time: unix_to_utc(entry.dt)?,
                temp: entry.temp,
                temp_feeling: entry.feels_like,
                temp_min: entry.temp_min,
                temp_max: entry.temp_max,
                humidity: entry.humidity,
            })
        })
        .collect()
}

fn first_condition(conditions: Vec<OwmWeather>, dt: i64) -> Result<OwmWeather> {
    conditions.into_iter().next().ok_or(OwmError::EmptyConditions { dt })
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct OwmWeather {
    #[serde(default)]
    id: i64,
    main: String,
    description: String,
    #[serde(default)]
    icon: String,
}

/// Measurement block shared by the `main` object of the current endpoint and
/// every entry of the one-call `current`/`minutely`/`hourly` fields. The
/// provider omits fields per endpoint (no `temp_min` on hourly entries, only
/// `dt` on minutely ones), so everything defaults to zero.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct OwmMain {
    dt: i64,
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: i64,
    humidity: f64,
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct OwmWind {
    speed: f64,
    deg: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct OwmClouds {
    all: i64,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct OwmCurrentResponse {
    dt: i64,
    weather: Vec<OwmWeather>,
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    clouds: OwmClouds,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct OwmForecastResponse {
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    current: Option<OwmMain>,
    #[serde(default)]
    minutely: Vec<OwmMain>,
    #[serde(default)]
    hourly: Vec<OwmMain>,
}
