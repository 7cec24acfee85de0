use std::sync::Arc;

use tracing::info;

use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::models::Vehicle;
use crate::repositories::VehicleStore;
use crate::utils::errors::AppError;

pub struct CreateVehicleController {
    store: Arc<dyn VehicleStore>,
}

impl CreateVehicleController {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self { store }
    }

    /// Valida el payload y guarda el vehículo. Un payload inválido nunca
    /// llega al store.
    pub async fn handle(&self, request: CreateVehicleRequest) -> Result<Vehicle, AppError> {
        let new_vehicle = request.into_new_vehicle()?;

        let vehicle = self.store.create_vehicle(new_vehicle).await?;

        info!(
            "🚗 Vehicle {} created ('{}', battery {}%)",
            vehicle.id(),
            vehicle.shortcode(),
            vehicle.battery()
        );
        Ok(vehicle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::fake_store::FakeStore;
    use crate::models::Position;

    fn request(shortcode: &str, battery: i32, longitude: f64, latitude: f64) -> CreateVehicleRequest {
        CreateVehicleRequest {
            shortcode: Some(shortcode.to_string()),
            battery: Some(f64::from(battery)),
            longitude: Some(longitude),
            latitude: Some(latitude),
        }
    }

    #[tokio::test]
    async fn test_creates_a_valid_vehicle() {
        let store = Arc::new(FakeStore::default());
        let controller = CreateVehicleController::new(store.clone());

        let vehicle = controller.handle(request("abac", 17, 45.0, 45.0)).await.unwrap();

        assert_eq!(vehicle.id(), 12);
        assert_eq!(vehicle.shortcode(), "abac");
        assert_eq!(vehicle.battery(), 17);
        assert_eq!(vehicle.position(), Position::new(45.0, 45.0).unwrap());
        assert_eq!(store.creates(), 1);
    }

    #[tokio::test]
    async fn test_shortcode_is_stored_as_sent() {
        let store = Arc::new(FakeStore::default());
        let controller = CreateVehicleController::new(store.clone());

        let vehicle = controller.handle(request(" abac ", 17, 45.0, 45.0)).await.unwrap();

        assert_eq!(vehicle.shortcode(), " abac ");
        assert_eq!(store.creates(), 1);
    }

    #[tokio::test]
    async fn test_invalid_battery_skips_the_store() {
        let store = Arc::new(FakeStore::default());
        let controller = CreateVehicleController::new(store.clone());

        let result = controller.handle(request("abac", 101, 45.0, 45.0)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.creates(), 0);
    }

    #[tokio::test]
    async fn test_invalid_position_skips_the_store() {
        let store = Arc::new(FakeStore::default());
        let controller = CreateVehicleController::new(store.clone());

        let result = controller.handle(request("abac", 50, 45.0, 91.0)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.creates(), 0);
    }

    #[tokio::test]
    async fn test_missing_shortcode_skips_the_store() {
        let store = Arc::new(FakeStore::default());
        let controller = CreateVehicleController::new(store.clone());

        let result = controller
            .handle(CreateVehicleRequest {
                shortcode: None,
                ..request("abac", 50, 0.0, 0.0)
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.creates(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_a_persistence_error() {
        let store = Arc::new(FakeStore::failing());
        let controller = CreateVehicleController::new(store.clone());

        let result = controller.handle(request("abac", 17, 45.0, 45.0)).await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert_eq!(store.creates(), 1);
    }
}
