use std::fmt;

use crate::model::WeatherObservation;

/// Above this (exclusive) a temperature is "Hot".
pub const HOT_ABOVE_C: f64 = 24.0;
/// Below this (exclusive) a temperature is "Cold".
pub const COLD_BELOW_C: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureLabel {
    Hot,
    Moderate,
    Cold,
}

impl TemperatureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureLabel::Hot => "Hot",
            TemperatureLabel::Moderate => "Moderate",
            TemperatureLabel::Cold => "Cold",
        }
    }
}

impl fmt::Display for TemperatureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled temperature. Values keep full precision; only `Display` rounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: TemperatureLabel,
    pub celsius: f64,
    pub fahrenheit: f64,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}F / {}C)",
            self.label,
            display_round(self.fahrenheit),
            display_round(self.celsius)
        )
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn classify(celsius: f64) -> Classification {
    let label = if celsius > HOT_ABOVE_C {
        TemperatureLabel::Hot
    } else if celsius < COLD_BELOW_C {
        TemperatureLabel::Cold
    } else {
        TemperatureLabel::Moderate
    };

    Classification {
        label,
        celsius,
        fahrenheit: celsius_to_fahrenheit(celsius),
    }
}

/// Plain-text body returned by `GET /weather`.
pub fn render_report(observation: &WeatherObservation) -> String {
    let classification = classify(observation.temperature_c);

    format!(
        "Current Temperature:\n  Weather     : {}\n  Temperature : {}",
        observation.description, classification
    )
}

// Ties go to even, like printf-style "%.0f". Adding 0.0 folds -0.0 into 0.0
// so "-0C" never shows up.
fn display_round(value: f64) -> f64 {
    value.round_ties_even() + 0.0
}
