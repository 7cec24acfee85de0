//! Modelos de dominio
//!
//! Tipos compartidos por el store, los controladores y la capa HTTP.

pub mod position;
pub mod vehicle;

pub use position::Position;
pub use vehicle::{NewVehicle, Vehicle};
