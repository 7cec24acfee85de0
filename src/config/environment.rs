//! Configuración de entorno
//!
//! Parámetros del servidor leídos de variables de entorno, con valores por
//! defecto para todo salvo la url de la base de datos.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::database::schema::SchemaName;
use crate::models::Position;

/// Esquema de la tabla de vehículos si `DATABASE_SCHEMA` no indica otro.
pub const DEFAULT_SCHEMA: &str = "vehicle_server";

pub use crate::models::position::DEFAULT_REFERENCE_POINT;

/// Configuración de entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    pub schema: SchemaName,
    pub reference_point: Position,
    pub create_schema_on_start: bool,
    pub cors_origins: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            schema: SchemaName::default(),
            reference_point: DEFAULT_REFERENCE_POINT,
            create_schema_on_start: false,
            cors_origins: Vec::new(),
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let schema = match env::var("DATABASE_SCHEMA") {
            Ok(name) => SchemaName::new(&name).context("DATABASE_SCHEMA")?,
            Err(_) => defaults.schema,
        };

        let reference_point = Position::new(
            env_or("REFERENCE_LONGITUDE", DEFAULT_REFERENCE_POINT.longitude())?,
            env_or("REFERENCE_LATITUDE", DEFAULT_REFERENCE_POINT.latitude())?,
        )
        .map_err(|e| anyhow!("invalid reference point: {}", e))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port)?,
            schema,
            reference_point,
            create_schema_on_start: env_or("CREATE_SCHEMA", defaults.create_schema_on_start)?,
            cors_origins,
        })
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Dirección de escucha; `HOST` puede ser una IP o un nombre resoluble.
    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

/// Lee y parsea `key`, o devuelve `default` si no está definida.
pub(crate) fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reference_point() {
        let point = EnvironmentConfig::default().reference_point;
        assert_eq!(point.longitude(), -70.0);
        assert_eq!(point.latitude(), 50.0);
    }

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.schema.as_str(), DEFAULT_SCHEMA);
        assert!(!config.create_schema_on_start);
    }

    #[tokio::test]
    async fn test_bind_address_accepts_host_names() {
        let config = EnvironmentConfig {
            host: "localhost".to_string(),
            port: 0,
            ..EnvironmentConfig::default()
        };
        let listener = tokio::net::TcpListener::bind(config.bind_address())
            .await
            .unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: u16 = env_or("VEHICLE_SERVER_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
