//! `VehicleStore` en memoria para los tests de controladores y rutas.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{NewVehicle, Position, Vehicle};
use crate::repositories::VehicleStore;
use crate::utils::errors::{AppResult, PersistenceError};

#[derive(Default)]
pub struct FakeStore {
    vehicles: Mutex<Vec<Vehicle>>,
    fail: bool,
    pub create_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_vehicles(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles: Mutex::new(vehicles),
            ..Self::default()
        }
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VehicleStore for FakeStore {
    async fn create_vehicle(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PersistenceError::Timeout.into());
        }

        let mut vehicles = self.vehicles.lock().unwrap();
        let created = vehicle.into_vehicle(vehicles.len() as i64 + 12);
        vehicles.push(created.clone());
        Ok(created)
    }

    // Mantiene el orden de inserción; ordenar es trabajo del store real.
    async fn list_vehicles(&self, _reference: Option<Position>) -> AppResult<Vec<Vehicle>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PersistenceError::Timeout.into());
        }
        Ok(self.vehicles.lock().unwrap().clone())
    }
}
