use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::{ApiKey, UpstreamConfig},
    error::UpstreamError,
    model::{Coordinate, WeatherObservation},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::Network(e.without_url()))?;

        let endpoint = format!("{}/weather", config.base_url.as_str().trim_end_matches('/'));

        Ok(Self { endpoint, http })
    }

    /// Full URL of the "current weather" endpoint, without query parameters.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_current(
        &self,
        at: Coordinate,
        api_key: &ApiKey,
    ) -> Result<WeatherObservation, UpstreamError> {
        let lat = format!("{:.6}", at.latitude);
        let lon = format!("{:.6}", at.longitude);

        // The request URL carries the API key, so it is stripped from every error.
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("appid", api_key.expose()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.without_url()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| UpstreamError::Network(e.without_url()))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        parse_current(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(
        &self,
        at: Coordinate,
        api_key: &ApiKey,
    ) -> Result<WeatherObservation, UpstreamError> {
        let observation = self.fetch_current(at, api_key).await?;

        tracing::debug!(
            location = observation.location_name.as_deref().unwrap_or("unknown"),
            observed_at = ?observation.observed_at,
            temperature_c = observation.temperature_c,
            "received current weather from OpenWeather"
        );

        Ok(observation)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
}

fn parse_current(body: &str) -> Result<WeatherObservation, UpstreamError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or(UpstreamError::EmptyConditions)?;

    Ok(WeatherObservation {
        description,
        temperature_c: parsed.main.temp,
        location_name: parsed.name.filter(|n| !n.is_empty()),
        observed_at: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
