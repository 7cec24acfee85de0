//! Estado compartido de la aplicación
//!
//! Estado que recibe cada handler de axum. El store se inyecta, así los tests
//! pueden cambiar el repositorio PostGIS por uno en memoria.

use std::sync::Arc;

use crate::repositories::VehicleStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VehicleStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self { store }
    }
}
