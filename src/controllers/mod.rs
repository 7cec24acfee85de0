pub mod create_vehicle_controller;
pub mod list_vehicles_controller;

pub use create_vehicle_controller::CreateVehicleController;
pub use list_vehicles_controller::ListVehiclesController;

#[cfg(test)]
pub(crate) mod fake_store;
