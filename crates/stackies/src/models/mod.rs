mod experience;

pub use experience::{CreateExperienceRequest, ExperienceResponse};
