//! Ciclo de vida del esquema
//!
//! Crea y elimina el esquema aislado que contiene la tabla `vehicles` y su
//! índice espacial. Son operaciones administrativas (arranque, preparación y
//! limpieza de tests) y no deben ejecutarse en paralelo sobre el mismo esquema.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::config::environment::DEFAULT_SCHEMA;
use crate::models::vehicle::{BATTERY_MAX, BATTERY_MIN, SHORTCODE_MAX_LEN};
use crate::utils::errors::SchemaError;

const DUPLICATE_SCHEMA: &str = "42P06";
const INVALID_SCHEMA_NAME: &str = "3F000";

/// Nombre de esquema seguro para interpolar en DDL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaName(String);

impl SchemaName {
    pub fn new(name: &str) -> Result<Self, SchemaError> {
        static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
        let identifier = IDENTIFIER.get_or_init(|| {
            Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier pattern is valid")
        });

        if identifier.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(SchemaError::InvalidName(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Nombre calificado de la tabla de vehículos.
    pub fn vehicles_table(&self) -> String {
        format!("{}.vehicles", self.0)
    }
}

impl Default for SchemaName {
    fn default() -> Self {
        Self(DEFAULT_SCHEMA.to_string())
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct SchemaManager {
    pool: PgPool,
    schema: SchemaName,
}

impl SchemaManager {
    pub fn new(pool: PgPool, schema: SchemaName) -> Self {
        Self { pool, schema }
    }

    /// Crea el esquema, la tabla de vehículos y su índice GiST en una sola
    /// transacción. Falla si el esquema ya existe.
    pub async fn create_schema(&self) -> Result<(), SchemaError> {
        let mut tx = self.pool.begin().await?;

        for statement in self.create_statements() {
            debug!("schema {}: {}", self.schema, statement);
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| self.classify(e))?;
        }

        tx.commit().await?;
        info!("🗄️ Schema '{}' created", self.schema);
        Ok(())
    }

    /// Elimina el esquema y todas sus filas.
    pub async fn drop_schema(&self) -> Result<(), SchemaError> {
        let statement = format!("DROP SCHEMA {} CASCADE", self.schema);
        sqlx::query(&statement)
            .execute(&self.pool)
            .await
            .map_err(|e| self.classify(e))?;

        info!("🗑️ Schema '{}' dropped", self.schema);
        Ok(())
    }

    pub async fn schema_exists(&self) -> Result<bool, SchemaError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)",
        )
        .bind(self.schema.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    fn create_statements(&self) -> Vec<String> {
        let table = self.schema.vehicles_table();
        vec![
            "CREATE EXTENSION IF NOT EXISTS postgis".to_string(),
            format!("CREATE SCHEMA {}", self.schema),
            format!(
                r#"
                CREATE TABLE {table} (
                    id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                    shortcode TEXT NOT NULL CHECK (char_length(shortcode) BETWEEN 1 AND {SHORTCODE_MAX_LEN}),
                    battery INTEGER NOT NULL CHECK (battery BETWEEN {BATTERY_MIN} AND {BATTERY_MAX}),
                    position GEOGRAPHY(POINT, 4326) NOT NULL
                )
                "#
            ),
            format!(
                "CREATE INDEX vehicles_position_idx ON {table} USING GIST (position)"
            ),
        ]
    }

    fn classify(&self, error: sqlx::Error) -> SchemaError {
        if let sqlx::Error::Database(db) = &error {
            match db.code().as_deref() {
                Some(DUPLICATE_SCHEMA) => return SchemaError::AlreadyExists(self.schema.to_string()),
                Some(INVALID_SCHEMA_NAME) => return SchemaError::NotFound(self.schema.to_string()),
                _ => {}
            }
        }
        SchemaError::Database(error)
    }
}
