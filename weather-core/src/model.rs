use chrono::{DateTime, Utc};

/// A validated latitude/longitude pair, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// The slice of the upstream "current weather" response this service uses.
#[derive(Debug, Clone)]
pub struct WeatherObservation {
    pub description: String,
    pub temperature_c: f64,
    pub location_name: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
}
