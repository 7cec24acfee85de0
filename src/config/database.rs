//! Configuración de base de datos
//!
//! Parámetros de conexión a PostgreSQL/PostGIS y el pool construido con ellos.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use super::environment::env_or;

/// Configuración de base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub statement_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            statement_timeout: Duration::from_millis(5000),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }

    /// Lee `DATABASE_URL` y las variables opcionales del pool.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let defaults = Self::new(url);

        Ok(Self {
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            acquire_timeout: Duration::from_secs(env_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?),
            statement_timeout: Duration::from_millis(env_or(
                "DATABASE_STATEMENT_TIMEOUT_MS",
                defaults.statement_timeout.as_millis() as u64,
            )?),
            ..defaults
        })
    }

    /// Opciones de conexión; cada sesión lleva `statement_timeout` para que
    /// ninguna operación del store quede colgada en el motor.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let options = PgConnectOptions::from_str(&self.url)
            .context("DATABASE_URL is not a valid PostgreSQL url")?
            .options([(
                "statement_timeout",
                self.statement_timeout.as_millis().to_string(),
            )]);
        Ok(options)
    }

    /// Crear el pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect_with(self.connect_options()?)
            .await
            .with_context(|| format!("cannot connect to {}", mask_database_url(&self.url)))?;

        Ok(pool)
    }
}

/// Oculta las credenciales de la url antes de loguearla
pub fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if scheme_end + 3 <= at_pos => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
