//! Modelo de vehículo
//!
//! `Vehicle` es la entidad persistida que devuelve el store. `NewVehicle` es
//! la entrada validada de la creación: el store sólo recibe campos que ya
//! pasaron la validación.

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::models::position::Position;
use crate::utils::errors::validation_error;

pub const SHORTCODE_MAX_LEN: usize = 16;
pub const BATTERY_MIN: i32 = 0;
pub const BATTERY_MAX: i32 = 100;

/// Vehículo persistido, con el id asignado por el store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: i64,
    shortcode: String,
    battery: i32,
    position: Position,
}

impl Vehicle {
    /// Construye un vehículo a partir de campos ya validados.
    pub fn new(id: i64, shortcode: String, battery: i32, position: Position) -> Self {
        Self {
            id,
            shortcode,
            battery,
            position,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn shortcode(&self) -> &str {
        &self.shortcode
    }

    pub fn battery(&self) -> i32 {
        self.battery
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// Entrada de creación validada
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    shortcode: String,
    battery: i32,
    position: Position,
}

impl NewVehicle {
    pub fn new(shortcode: &str, battery: i64, position: Position) -> Result<Self, ValidationErrors> {
        // Se guarda tal cual; los espacios sólo cuentan para detectar un valor en blanco.
        if shortcode.trim().is_empty() {
            return Err(validation_error(
                "shortcode",
                "required",
                "shortcode must not be blank".to_string(),
            ));
        }
        if shortcode.chars().count() > SHORTCODE_MAX_LEN {
            return Err(validation_error(
                "shortcode",
                "length",
                format!("shortcode must be at most {} characters", SHORTCODE_MAX_LEN),
            ));
        }
        if battery < i64::from(BATTERY_MIN) || battery > i64::from(BATTERY_MAX) {
            return Err(validation_error(
                "battery",
                "range",
                format!(
                    "battery must be between {} and {}, got {}",
                    BATTERY_MIN, BATTERY_MAX, battery
                ),
            ));
        }

        Ok(Self {
            shortcode: shortcode.to_string(),
            // Rango validado arriba.
            battery: battery as i32,
            position,
        })
    }

    pub fn shortcode(&self) -> &str {
        &self.shortcode
    }

    pub fn battery(&self) -> i32 {
        self.battery
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Asigna el id devuelto por el store.
    pub fn into_vehicle(self, id: i64) -> Vehicle {
        Vehicle::new(id, self.shortcode, self.battery, self.position)
    }
}
