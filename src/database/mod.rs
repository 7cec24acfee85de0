//! Módulo de base de datos
//!
//! Ciclo de vida del esquema PostGIS que contiene la tabla de vehículos.

pub mod schema;

pub use schema::{SchemaManager, SchemaName};
