//! Modelo de posición geográfica
//!
//! Par longitud/latitud WGS84. Se valida al construirlo y al deserializarlo;
//! después es inmutable.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{ValidationError, ValidationErrors};

pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;

/// SRID de WGS84, usado para todos los puntos guardados
pub const SRID_WGS84: i32 = 4326;

/// Punto de referencia para ordenar la flota cuando no se indica otro.
pub const DEFAULT_REFERENCE_POINT: Position = Position {
    longitude: -70.0,
    latitude: 50.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    longitude: f64,
    latitude: f64,
}

#[derive(Deserialize)]
struct RawPosition {
    longitude: f64,
    latitude: f64,
}

impl Position {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_longitude(longitude) {
            errors.add("longitude", e);
        }
        if let Err(e) = validate_latitude(latitude) {
            errors.add("latitude", e);
        }

        if errors.errors().is_empty() {
            Ok(Self { longitude, latitude })
        } else {
            Err(errors)
        }
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPosition::deserialize(deserializer)?;
        Position::new(raw.longitude, raw.latitude).map_err(serde::de::Error::custom)
    }
}

/// La longitud debe ser finita y estar en [-180, 180].
pub fn validate_longitude(value: f64) -> Result<(), ValidationError> {
    check_coordinate("longitude", value, MIN_LONGITUDE, MAX_LONGITUDE)
}

/// La latitud debe ser finita y estar en [-90, 90].
pub fn validate_latitude(value: f64) -> Result<(), ValidationError> {
    check_coordinate("latitude", value, MIN_LATITUDE, MAX_LATITUDE)
}

fn check_coordinate(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    let (code, message) = if !value.is_finite() {
        ("finite", format!("{} must be a finite number", field))
    } else if value < min || value > max {
        (
            "range",
            format!("{} must be between {} and {}, got {}", field, min, max, value),
        )
    } else {
        return Ok(());
    };

    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    Err(error)
}
