use std::str::FromStr;

use serde::Serialize;

/// A `latitude, longitude` pair as typed by users of the crop prediction form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid format. Please provide coordinates as 'latitude, longitude'")]
pub struct CoordinateError;

impl Coordinates {
    pub fn parse(raw: &str) -> Result<Self, CoordinateError> {
        let mut parts = raw.split(',');
        let (Some(latitude), Some(longitude), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CoordinateError);
        };

        Ok(Self {
            latitude: parse_component(latitude)?,
            longitude: parse_component(longitude)?,
        })
    }
}

impl FromStr for Coordinates {
    type Err = CoordinateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

fn parse_component(raw: &str) -> Result<f64, CoordinateError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(CoordinateError)
}
