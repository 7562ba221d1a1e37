use serde::{Deserialize, Serialize};

/// A stored experience row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    /// Database-assigned identifier.
    pub id: i64,
    /// Unique, non-empty title.
    pub title: String,
}

/// Insert payload for an experience that has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExperience {
    pub title: String,
}

impl NewExperience {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Experience as handed from the use case to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceDto {
    pub id: i64,
    pub title: String,
}

impl From<Experience> for ExperienceDto {
    fn from(experience: Experience) -> Self {
        Self {
            id: experience.id,
            title: experience.title,
        }
    }
}
