use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    sync::LazyLock,
    time::Duration,
};

use regex::Regex;
use reqwest::Url;

use crate::error::{ConfigError, CredentialError};

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const LISTEN_ADDR_VAR: &str = "HTTP_LISTEN_ADDR";
pub const LISTEN_PORT_VAR: &str = "HTTP_LISTEN_PORT";
pub const BASE_URL_VAR: &str = "OPENWEATHER_BASE_URL";
pub const TIMEOUT_VAR: &str = "OPENWEATHER_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

static API_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-f0-9]{32}$").expect("API key pattern compiles"));

/// OpenWeather API key. Never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl TryFrom<&str> for ApiKey {
    type Error = CredentialError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Missing);
        }
        if !API_KEY_PATTERN.is_match(trimmed) {
            return Err(CredentialError::InvalidFormat);
        }
        Ok(ApiKey(trimmed.to_string()))
    }
}

/// Where and how long to talk to the weather provider.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL parses"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Everything the service needs, resolved once at startup.
///
/// A bad listen address or port is fatal. A bad API key is not: it is kept as
/// an error so that weather lookups fail with 500 while `/health` keeps working.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub api_key: Result<ApiKey, CredentialError>,
    pub upstream: UpstreamConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build the config from any variable source; tests pass a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            listen_addr: listen_address_from(&lookup)?,
            api_key: api_key_from(&lookup),
            upstream: upstream_from(&lookup)?,
        })
    }
}

pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

pub fn api_key_from<F>(lookup: F) -> Result<ApiKey, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(API_KEY_VAR).unwrap_or_default();
    ApiKey::try_from(raw.as_str())
}

pub fn listen_address_from<F>(lookup: F) -> Result<SocketAddr, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw_addr = lookup(LISTEN_ADDR_VAR).unwrap_or_default();
    let raw_port = lookup(LISTEN_PORT_VAR).unwrap_or_default();

    if raw_addr.trim().is_empty() {
        return Err(ConfigError::MissingAddress);
    }
    if raw_port.trim().is_empty() {
        return Err(ConfigError::MissingPort);
    }

    let ip: IpAddr = raw_addr
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(raw_addr.clone()))?;

    let port = raw_port
        .parse::<u16>()
        .ok()
        .filter(|p| *p != 0)
        .ok_or_else(|| ConfigError::InvalidPort(raw_port.clone()))?;

    Ok(SocketAddr::new(ip, port))
}

pub fn upstream_from<F>(lookup: F) -> Result<UpstreamConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = UpstreamConfig::default();

    if let Some(raw) = lookup(BASE_URL_VAR).filter(|s| !s.trim().is_empty()) {
        let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidBaseUrl(raw.clone()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(raw));
        }
        cfg.base_url = url;
    }

    if let Some(raw) = lookup(TIMEOUT_VAR).filter(|s| !s.trim().is_empty()) {
        let secs = raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
        cfg.timeout = Duration::from_secs(secs);
    }

    Ok(cfg)
}
