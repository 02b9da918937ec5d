use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::{ApiKey, UpstreamConfig},
    error::UpstreamError,
    model::{Coordinate, WeatherObservation},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current conditions for a coordinate.
///
/// The HTTP layer only depends on this trait, so tests can swap in a canned provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(
        &self,
        at: Coordinate,
        api_key: &ApiKey,
    ) -> Result<WeatherObservation, UpstreamError>;
}

/// Construct the OpenWeather provider from upstream settings.
pub fn provider_from_config(config: &UpstreamConfig) -> Result<OpenWeatherProvider, UpstreamError> {
    OpenWeatherProvider::new(config)
}
