//! In-memory repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use stackies_core::experience::{Experience, NewExperience};
use stackies_core::storage::{ExperienceRepository, RepositoryError, Result};

/// In-memory storage backend.
///
/// Ids are assigned sequentially from 1 and titles are unique, mirroring the
/// Postgres table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    experiences: Arc<RwLock<Vec<Experience>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExperienceRepository for InMemoryRepository {
    async fn create(&self, experience: &NewExperience) -> Result<Experience> {
        let mut experiences = self.experiences.write().await;

        if experiences.iter().any(|e| e.title == experience.title) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Experience",
                key: experience.title.clone(),
            });
        }

        let id = experiences.last().map(|e| e.id + 1).unwrap_or(1);
        let stored = Experience {
            id,
            title: experience.title.clone(),
        };
        experiences.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Experience>> {
        let experiences = self.experiences.read().await;
        Ok(experiences.clone())
    }
}
