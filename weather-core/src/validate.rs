//! Range checks for inbound coordinates.
//!
//! Values are validated before they are ever forwarded to the weather provider.

use crate::{
    error::{Axis, ValidationError},
    model::Coordinate,
};

pub fn validate_latitude(raw: &str) -> Result<f64, ValidationError> {
    validate_axis(Axis::Latitude, raw)
}

pub fn validate_longitude(raw: &str) -> Result<f64, ValidationError> {
    validate_axis(Axis::Longitude, raw)
}

/// Validate both query values, latitude first.
pub fn validate_coordinate(lat: &str, lon: &str) -> Result<Coordinate, ValidationError> {
    Ok(Coordinate {
        latitude: validate_latitude(lat)?,
        longitude: validate_longitude(lon)?,
    })
}

fn validate_axis(axis: Axis, raw: &str) -> Result<f64, ValidationError> {
    // `f64::from_str` also accepts "inf" and "NaN"; neither is a coordinate.
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidFormat { axis, raw: raw.to_string() })?;

    let limit = axis.limit();
    if !(-limit..=limit).contains(&value) {
        return Err(ValidationError::OutOfRange { axis, value });
    }

    Ok(value)
}
