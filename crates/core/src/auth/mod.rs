mod error;
mod functions;
mod types;
mod validation;

pub use error::AuthError;
pub use functions::{authorize_url_from_token_url, jwks_url_from_issuer};
pub use types::{CallbackParams, Claims, TokenResponse};
pub use validation::{extract_bearer, validate_callback};
