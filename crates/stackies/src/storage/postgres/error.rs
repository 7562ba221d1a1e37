//! Postgres error mapping.
//!
//! Maps `sqlx::Error` to `RepositoryError` from `stackies_core::storage`.
//! Specific errors are mapped to semantic variants (e.g., UNIQUE constraint to AlreadyExists).

use stackies_core::storage::RepositoryError;

/// Maps an sqlx error to a RepositoryError.
///
/// # Error Mapping
///
/// - Unique violation (`23505`) → `RepositoryError::AlreadyExists`
/// - Check violation (`23514`) → `RepositoryError::InvalidData`
/// - Pool, I/O and TLS errors → `RepositoryError::ConnectionFailed`
/// - Row decoding errors → `RepositoryError::Serialization`
/// - All other errors → `RepositoryError::QueryFailed`
pub fn map_sqlx_error(err: sqlx::Error, entity_type: &'static str, key: &str) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::AlreadyExists {
                entity_type,
                key: key.to_string(),
            }
        }

        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            RepositoryError::InvalidData(db_err.message().to_string())
        }

        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => RepositoryError::ConnectionFailed(err.to_string()),

        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::RowNotFound => RepositoryError::Serialization(err.to_string()),

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}
