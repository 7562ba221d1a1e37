use serde::{Deserialize, Serialize};
use stackies_core::experience::ExperienceDto;

/// Request payload for creating an experience. Echoed back on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExperienceRequest {
    pub title: String,
}

/// An experience as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceResponse {
    pub id: i64,
    pub title: String,
}

impl From<ExperienceDto> for ExperienceResponse {
    fn from(dto: ExperienceDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
        }
    }
}
