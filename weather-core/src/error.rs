use thiserror::Error;

/// Which coordinate axis a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }

    /// Inclusive bound on the absolute value, in degrees.
    pub fn limit(&self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn range_text(axis: &Axis) -> String {
    let limit = axis.limit();
    format!("-{limit} to {limit} degrees")
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid {axis} format: {raw}")]
    InvalidFormat { axis: Axis, raw: String },

    #[error("{axis} out of range ({}): {value}", range_text(.axis))]
    OutOfRange { axis: Axis, value: f64 },
}

impl ValidationError {
    pub fn axis(&self) -> Axis {
        match self {
            ValidationError::InvalidFormat { axis, .. }
            | ValidationError::OutOfRange { axis, .. } => *axis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("OPENWEATHER_API_KEY is not set")]
    Missing,

    #[error("API key failed pattern check")]
    InvalidFormat,
}

/// Startup configuration problems. All of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing IP address (HTTP_LISTEN_ADDR not set)")]
    MissingAddress,

    #[error("missing port (HTTP_LISTEN_PORT not set)")]
    MissingPort,

    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("invalid port number: {0}")]
    InvalidPort(String),

    #[error("invalid upstream timeout (seconds): {0}")]
    InvalidTimeout(String),

    #[error("invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to OpenWeather failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("OpenWeather request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse OpenWeather JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("OpenWeather response contained no weather conditions")]
    EmptyConditions,
}
