use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::database::schema::SchemaName;
use crate::models::position::SRID_WGS84;
use crate::models::{NewVehicle, Position, Vehicle};
use crate::utils::errors::{AppResult, PersistenceError};

/// Interfaz de persistencia usada por los controladores.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Inserta un vehículo y lo devuelve con el id asignado por el store.
    async fn create_vehicle(&self, vehicle: NewVehicle) -> AppResult<Vehicle>;

    /// Todos los vehículos, primero el más cercano a `reference` (o al punto
    /// por defecto del store), empates por id ascendente.
    async fn list_vehicles(&self, reference: Option<Position>) -> AppResult<Vec<Vehicle>>;
}

// Fila devuelta por las consultas, posición en grados
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: i64,
    shortcode: String,
    battery: i32,
    longitude: f64,
    latitude: f64,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = PersistenceError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        let position = Position::new(row.longitude, row.latitude).map_err(|e| {
            PersistenceError::MalformedGeometry {
                id: row.id,
                reason: e.to_string(),
            }
        })?;
        Ok(Vehicle::new(row.id, row.shortcode, row.battery, position))
    }
}

/// Store de vehículos sobre PostGIS
#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
    schema: SchemaName,
    default_reference: Position,
}

impl fmt::Debug for VehicleRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VehicleRepository")
            .field("schema", &self.schema)
            .field("default_reference", &self.default_reference)
            .finish()
    }
}

impl VehicleRepository {
    pub fn new(pool: PgPool, schema: SchemaName, default_reference: Position) -> Self {
        Self {
            pool,
            schema,
            default_reference,
        }
    }

    pub async fn count_vehicles(&self) -> AppResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", self.schema.vehicles_table()))
                .fetch_one(&self.pool)
                .await
                .map_err(PersistenceError::from)?;

        Ok(count)
    }
}

#[async_trait]
impl VehicleStore for VehicleRepository {
    async fn create_vehicle(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let query = format!(
            r#"
            INSERT INTO {table} (shortcode, battery, position)
            VALUES ($1, $2, ST_SetSRID(ST_MakePoint($3, $4), $5)::geography)
            RETURNING id, shortcode, battery,
                      ST_X(position::geometry) AS longitude,
                      ST_Y(position::geometry) AS latitude
            "#,
            table = self.schema.vehicles_table()
        );

        let position = vehicle.position();
        let row = sqlx::query_as::<_, VehicleRow>(&query)
            .bind(vehicle.shortcode())
            .bind(vehicle.battery())
            .bind(position.longitude())
            .bind(position.latitude())
            .bind(SRID_WGS84)
            .fetch_one(&self.pool)
            .await
            .map_err(PersistenceError::from)?;

        debug!("vehicle {} stored as '{}'", row.id, row.shortcode);
        Ok(Vehicle::try_from(row)?)
    }

    async fn list_vehicles(&self, reference: Option<Position>) -> AppResult<Vec<Vehicle>> {
        let reference = reference.unwrap_or(self.default_reference);

        // Distancia sobre el esferoide WGS84 redondeada al milímetro: dos vehículos
        // empatan si caen en el mismo milímetro redondeado, no si están a menos
        // de 1 mm entre sí. Los empates se ordenan por id.
        let query = format!(
            r#"
            SELECT id, shortcode, battery,
                   ST_X(position::geometry) AS longitude,
                   ST_Y(position::geometry) AS latitude
            FROM {table}
            ORDER BY ROUND(ST_Distance(position, ST_SetSRID(ST_MakePoint($1, $2), $3)::geography)::numeric, 3) ASC,
                     id ASC
            "#,
            table = self.schema.vehicles_table()
        );

        let rows = sqlx::query_as::<_, VehicleRow>(&query)
            .bind(reference.longitude())
            .bind(reference.latitude())
            .bind(SRID_WGS84)
            .fetch_all(&self.pool)
            .await
            .map_err(PersistenceError::from)?;

        debug!(
            "listed {} vehicles from ({}, {})",
            rows.len(),
            reference.longitude(),
            reference.latitude()
        );

        let vehicles = rows
            .into_iter()
            .map(Vehicle::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(vehicles)
    }
}
