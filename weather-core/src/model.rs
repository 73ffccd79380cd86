use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider-agnostic weather record.
///
/// Temperatures are in degrees Celsius (requests use metric units),
/// humidity is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Short condition label, e.g. "Clear" or "Rain".
    pub kind: String,
    pub description: String,
    /// IANA timezone of the location; only forecast responses carry it.
    pub timezone: Option<String>,
    pub date_time: DateTime<Utc>,
    pub temp: f64,
    pub temp_feeling: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {:.1}°C, feels like {:.1}°C, min {:.1}°C, max {:.1}°C, humidity {}%",
            self.date_time.format("%Y-%m-%d %H:%M UTC"),
            self.kind,
            self.description,
            self.temp,
            self.temp_feeling,
            self.temp_min,
            self.temp_max,
            self.humidity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_single_line() {
        let weather = Weather {
            kind: "Clear".into(),
            description: "clear sky".into(),
            timezone: None,
            date_time: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            temp: 20.5,
            temp_feeling: 19.8,
            temp_min: 18.0,
            temp_max: 22.0,
            humidity: 55.0,
        };

        assert_eq!(
            weather.to_string(),
            "2023-11-14 22:13 UTC Clear (clear sky): 20.5°C, feels like 19.8°C, \
             min 18.0°C, max 22.0°C, humidity 55%"
        );
    }
}
