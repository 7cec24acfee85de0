use std::sync::Arc;

use tracing::info;

use crate::dto::vehicle_dto::VehicleListResponse;
use crate::repositories::VehicleStore;
use crate::utils::errors::AppError;

pub struct ListVehiclesController {
    store: Arc<dyn VehicleStore>,
}

impl ListVehiclesController {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self { store }
    }

    /// Toda la flota ordenada desde el punto de referencia por defecto del store.
    pub async fn handle(&self) -> Result<VehicleListResponse, AppError> {
        let vehicles = self.store.list_vehicles(None).await?;
        info!("📋 Listed {} vehicles", vehicles.len());
        Ok(VehicleListResponse::from(vehicles))
    }
}
