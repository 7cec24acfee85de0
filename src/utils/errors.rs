//! Manejo de errores
//!
//! Define los errores del servidor de vehículos y cómo cada uno se convierte
//! en una respuesta HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// `query_canceled` de PostgreSQL, lanzado cuando vence `statement_timeout`.
const QUERY_CANCELED: &str = "57014";

/// Error principal de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// El motor de persistencia rechazó o no pudo completar una operación.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("operation timed out")]
    Timeout,

    #[error("malformed stored position for vehicle {id}: {reason}")]
    MalformedGeometry { id: i64, reason: String },
}

impl From<sqlx::Error> for PersistenceError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::PoolTimedOut => PersistenceError::Timeout,
            sqlx::Error::Database(db) if db.code().as_deref() == Some(QUERY_CANCELED) => {
                PersistenceError::Timeout
            }
            _ => PersistenceError::Database(error),
        }
    }
}

/// Falló una operación administrativa del esquema.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid schema name '{0}'")]
    InvalidName(String),

    #[error("schema '{0}' already exists")]
    AlreadyExists(String),

    #[error("schema '{0}' does not exist")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Estructura de respuesta de error
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: None,
                        code: Some("PERSISTENCE_ERROR".to_string()),
                    },
                )
            }

            AppError::Schema(e) => {
                tracing::error!("Schema error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: None,
                        code: Some("SCHEMA_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Crea un error de validación de un campo con un mensaje legible.
pub fn validation_error(field: &'static str, code: &'static str, message: String) -> ValidationErrors {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// Helper para bodies mal formados
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
