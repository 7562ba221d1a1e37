//! Experience use case.
//!
//! A thin layer between the HTTP presenter and the repository: it validates
//! input, builds entities, and maps stored rows into DTOs.

use std::sync::Arc;

use crate::storage::ExperienceRepository;

use super::{validate_title, ExperienceDto, ExperienceError, NewExperience};

/// Use case for creating and listing experiences.
#[derive(Clone)]
pub struct ExperienceService {
    repository: Arc<dyn ExperienceRepository>,
}

impl ExperienceService {
    pub fn new(repository: Arc<dyn ExperienceRepository>) -> Self {
        Self { repository }
    }

    /// Stores a new experience with the given title.
    pub async fn create(&self, title: &str) -> Result<(), ExperienceError> {
        validate_title(title)?;
        self.repository.create(&NewExperience::new(title)).await?;
        Ok(())
    }

    /// Returns every experience in storage order.
    pub async fn list(&self) -> Result<Vec<ExperienceDto>, ExperienceError> {
        let experiences = self.repository.list().await?;
        Ok(experiences.into_iter().map(ExperienceDto::from).collect())
    }
}
