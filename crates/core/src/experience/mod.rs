mod error;
mod service;
mod types;
mod validation;

pub use error::ExperienceError;
pub use service::ExperienceService;
pub use types::{Experience, ExperienceDto, NewExperience};
pub use validation::validate_title;
