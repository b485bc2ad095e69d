//! Conversions from external infrastructure errors into domain errors.

use chronos_domain::ChronosError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ChronosError);

impl From<InfraError> for ChronosError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ChronosError> for InfraError {
    fn from(value: ChronosError) -> Self {
        InfraError(value)
    }
}

impl From<SqlError> for InfraError {
    fn from(err: SqlError) -> Self {
        use rusqlite::ffi::ErrorCode;

        let mapped = match err {
            SqlError::SqliteFailure(code, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match code.code {
                    ErrorCode::DatabaseBusy => ChronosError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        ChronosError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => ChronosError::Database(format!(
                        "constraint violation (code {}): {message}",
                        code.extended_code
                    )),
                    _ => ChronosError::Database(format!(
                        "sqlite failure {:?} (code {}): {message}",
                        code.code, code.extended_code
                    )),
                }
            }
            SqlError::QueryReturnedNoRows => {
                ChronosError::NotFound("no rows returned by query".into())
            }
            SqlError::FromSqlConversionFailure(_, _, cause) => {
                ChronosError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            SqlError::InvalidColumnType(_, _, ty) => {
                ChronosError::Database(format!("invalid column type: {ty}"))
            }
            other => ChronosError::Database(format!("sqlite error: {other}")),
        };

        InfraError(mapped)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        InfraError(ChronosError::Database(format!("connection pool error: {err}")))
    }
}

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let mapped = if err.is_timeout() {
            ChronosError::Network(format!("http request timed out: {err}"))
        } else if err.is_connect() {
            ChronosError::Network(format!("http connection failed: {err}"))
        } else {
            ChronosError::Network(format!("http error: {err}"))
        };
        InfraError(mapped)
    }
}

impl From<tokio::task::JoinError> for InfraError {
    fn from(err: tokio::task::JoinError) -> Self {
        InfraError(ChronosError::Internal(format!("task join error: {err}")))
    }
}
