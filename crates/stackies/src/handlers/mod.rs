pub mod error;
pub mod experiences;
pub mod health;
pub mod root;

pub use error::AppError;
