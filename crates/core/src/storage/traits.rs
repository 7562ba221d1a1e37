use async_trait::async_trait;

use crate::experience::{Experience, NewExperience};

use super::Result;

/// Repository for the `experiences` table.
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    /// Inserts a new experience and returns it with its assigned ID.
    ///
    /// Titles are unique; inserting a duplicate fails with
    /// [`super::RepositoryError::AlreadyExists`].
    async fn create(&self, experience: &NewExperience) -> Result<Experience>;

    /// Returns all experiences in insertion order.
    async fn list(&self) -> Result<Vec<Experience>>;
}
