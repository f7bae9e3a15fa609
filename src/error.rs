//! Error taxonomy shared by services and the IPC boundary

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or malformed input, raised before any database call
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Share-sum or ramme overflow and similar rule violations
    #[error("{0}")]
    BusinessRule(String),

    /// Blob storage, key vault or report API failure (message already sanitized)
    #[error("{0}")]
    Infrastructure(String),

    #[error("Databasefeil: {0}")]
    Database(DbErr),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(field: &str, message: impl std::fmt::Display) -> Self {
        ServiceError::Validation(format!("{}: {}", field, message))
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} med id {} finnes ikke", entity, id))
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::debug!(detail = %detail, "Foreign key violation");
                ServiceError::NotFound("Relatert entitet ble ikke funnet".to_string())
            }
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!(detail = %detail, "Unique constraint violation");
                ServiceError::Validation("Verdien finnes allerede".to_string())
            }
            _ => match err {
                DbErr::RecordNotFound(what) => ServiceError::NotFound(what),
                other => ServiceError::Database(other),
            },
        }
    }
}

/// Start-up configuration problems
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ServiceError::validation("organisasjonsnummer", "må være 9 siffer");
        assert_eq!(err.to_string(), "organisasjonsnummer: må være 9 siffer");
    }

    #[test]
    fn test_record_not_found_maps_to_not_found() {
        let err: ServiceError = DbErr::RecordNotFound("Tilbud".to_string()).into();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Missing("DATABASE_URL");
        assert_eq!(err.to_string(), "DATABASE_URL must be set");
    }
}
