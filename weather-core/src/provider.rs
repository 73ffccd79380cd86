use chrono::{DateTime, Utc};

use crate::error::{OwmError, Result};

pub mod openweather;

/// Name every client error is prefixed with.
pub const PROVIDER_NAME: &str = "open-weather-map";

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0).ok_or(OwmError::InvalidTimestamp(ts))
}
