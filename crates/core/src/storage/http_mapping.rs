//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// Storage failures surface as 500 regardless of their cause, including a
/// duplicate title. Only `InvalidData` is reported as the caller's fault:
///
/// - `AlreadyExists` -> 500 (Internal Server Error)
/// - `ConnectionFailed` -> 500 (Internal Server Error)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use stackies_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::QueryFailed("syntax error".to_string());
/// assert_eq!(repository_error_to_status_code(&error), 500);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::AlreadyExists { .. } => 500,
        RepositoryError::ConnectionFailed(_) => 500,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}
