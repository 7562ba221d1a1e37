use thiserror::Error;

use crate::storage::RepositoryError;

/// Errors returned by the experience use case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExperienceError {
    #[error("title is required")]
    EmptyTitle,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ExperienceError {
    /// HTTP status code for this error.
    ///
    /// Validation failures are client errors; storage failures defer to
    /// [`crate::storage::repository_error_to_status_code`].
    pub fn status_code(&self) -> u16 {
        match self {
            ExperienceError::EmptyTitle => 400,
            ExperienceError::Repository(err) => {
                crate::storage::repository_error_to_status_code(err)
            }
        }
    }
}
