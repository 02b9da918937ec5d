//! Core library for the weather lookup service.
//!
//! This crate defines:
//! - Startup configuration and credential handling
//! - Coordinate validation
//! - The OpenWeather client behind the `WeatherProvider` trait
//! - Temperature classification and the plain-text report
//!
//! It is used by `weather-server`, but has no HTTP server code of its own.

pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod validate;

pub use classify::{
    Classification, TemperatureLabel, celsius_to_fahrenheit, classify, render_report,
};
pub use config::{ApiKey, ServerConfig, UpstreamConfig};
pub use error::{Axis, ConfigError, CredentialError, UpstreamError, ValidationError};
pub use model::{Coordinate, WeatherObservation};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
pub use validate::{validate_coordinate, validate_latitude, validate_longitude};
