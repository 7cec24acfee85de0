use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::position::{validate_latitude, validate_longitude};
use crate::models::vehicle::{BATTERY_MAX, BATTERY_MIN};
use crate::models::{NewVehicle, Position, Vehicle};
use crate::utils::errors::validation_error;

// Body para crear un vehículo. Todos los campos son opcionales para serde,
// así un campo ausente lo reporta la validación y no el parser JSON.
// La batería se lee como cualquier número JSON; la validación comprueba que
// sea entero y esté en rango, así `17.5` da un error del campo.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(required, length(min = 1, max = 16))]
    pub shortcode: Option<String>,

    #[validate(required)]
    pub battery: Option<f64>,

    #[validate(required)]
    pub longitude: Option<f64>,

    #[validate(required)]
    pub latitude: Option<f64>,
}

impl CreateVehicleRequest {
    /// Valida el payload y construye la entrada de dominio.
    pub fn into_new_vehicle(self) -> Result<NewVehicle, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Some(Err(e)) = self.battery.map(validate_battery) {
            errors.add("battery", e);
        }
        if let Some(Err(e)) = self.longitude.map(validate_longitude) {
            errors.add("longitude", e);
        }
        if let Some(Err(e)) = self.latitude.map(validate_latitude) {
            errors.add("latitude", e);
        }
        if !errors.errors().is_empty() {
            return Err(errors);
        }

        let (Some(shortcode), Some(battery), Some(longitude), Some(latitude)) =
            (self.shortcode, self.battery, self.longitude, self.latitude)
        else {
            return Err(validation_error(
                "body",
                "required",
                "shortcode, battery, longitude and latitude are required".to_string(),
            ));
        };

        let position = Position::new(longitude, latitude)?;
        // Entero en 0..=100, validado arriba.
        NewVehicle::new(&shortcode, battery as i64, position)
    }
}

fn validate_battery(value: f64) -> Result<(), ValidationError> {
    let (code, message) = if !value.is_finite() || value.fract() != 0.0 {
        ("integer", format!("battery must be a whole number, got {}", value))
    } else if value < f64::from(BATTERY_MIN) || value > f64::from(BATTERY_MAX) {
        (
            "range",
            format!(
                "battery must be between {} and {}, got {}",
                BATTERY_MIN, BATTERY_MAX, value
            ),
        )
    } else {
        return Ok(());
    };

    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    Err(error)
}

// Respuesta de listado, conserva el orden del store
#[derive(Debug, Serialize, Deserialize)]
pub struct VehicleListResponse {
    pub vehicles: Vec<Vehicle>,
}

impl From<Vec<Vehicle>> for VehicleListResponse {
    fn from(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> CreateVehicleRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_valid_request_builds_new_vehicle() {
        let new_vehicle = request(serde_json::json!({
            "shortcode": "abac",
            "battery": 17,
            "longitude": 45,
            "latitude": 45
        }))
        .into_new_vehicle()
        .unwrap();

        assert_eq!(new_vehicle.shortcode(), "abac");
        assert_eq!(new_vehicle.battery(), 17);
        assert_eq!(new_vehicle.position(), Position::new(45.0, 45.0).unwrap());
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let err = request(serde_json::json!({ "battery": 17 }))
            .into_new_vehicle()
            .unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("shortcode"));
        assert!(fields.contains_key("longitude"));
        assert!(fields.contains_key("latitude"));
        assert!(!fields.contains_key("battery"));
    }

    #[test]
    fn test_out_of_range_values_are_reported() {
        let err = request(serde_json::json!({
            "shortcode": "abcd",
            "battery": 120,
            "longitude": -190.0,
            "latitude": 45.0
        }))
        .into_new_vehicle()
        .unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("battery"));
        assert!(fields.contains_key("longitude"));
    }

    #[test]
    fn test_empty_shortcode_is_rejected() {
        let err = request(serde_json::json!({
            "shortcode": "",
            "battery": 10,
            "longitude": 0.0,
            "latitude": 0.0
        }))
        .into_new_vehicle()
        .unwrap_err();
        assert!(err.field_errors().contains_key("shortcode"));
    }

    #[test]
    fn test_fractional_battery_is_a_field_error() {
        let err = request(serde_json::json!({
            "shortcode": "abcd",
            "battery": 17.5,
            "longitude": 0.0,
            "latitude": 0.0
        }))
        .into_new_vehicle()
        .unwrap_err();
        assert_eq!(err.field_errors()["battery"][0].code, "integer");
    }

    #[test]
    fn test_whole_float_battery_is_accepted() {
        let new_vehicle = request(serde_json::json!({
            "shortcode": "abcd",
            "battery": 17.0,
            "longitude": 0.0,
            "latitude": 0.0
        }))
        .into_new_vehicle()
        .unwrap();
        assert_eq!(new_vehicle.battery(), 17);
    }

    #[test]
    fn test_padded_shortcode_is_kept() {
        let new_vehicle = request(serde_json::json!({
            "shortcode": " abac ",
            "battery": 17,
            "longitude": 45,
            "latitude": 45
        }))
        .into_new_vehicle()
        .unwrap();
        assert_eq!(new_vehicle.shortcode(), " abac ");
    }

    #[test]
    fn test_blank_shortcode_is_rejected() {
        let err = request(serde_json::json!({
            "shortcode": "   ",
            "battery": 17,
            "longitude": 45,
            "latitude": 45
        }))
        .into_new_vehicle()
        .unwrap_err();
        assert_eq!(err.field_errors()["shortcode"][0].code, "required");
    }

    #[test]
    fn test_list_envelope_shape() {
        let vehicle = Vehicle::new(1, "abcd".to_string(), 94, Position::new(-71.060316, 48.432044).unwrap());
        let json = serde_json::to_value(VehicleListResponse::from(vec![vehicle])).unwrap();
        assert_eq!(json["vehicles"][0]["shortcode"], "abcd");
        assert_eq!(json["vehicles"][0]["position"]["latitude"], 48.432044);
    }
}
