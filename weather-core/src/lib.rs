//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Client configuration & on-disk persistence
//! - The OpenWeatherMap adapter (current weather and hourly forecast)
//! - The normalized `Weather` record callers work with
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, Location};
pub use error::{OwmError, Result};
pub use model::Weather;
pub use provider::{PROVIDER_NAME, openweather::OpenWeatherMap};
