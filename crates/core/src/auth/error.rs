use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token claims are not a JSON object")]
    InvalidClaims,

    #[error("no key found for kid {0:?}")]
    KeyNotFound(Option<String>),

    #[error("JWKS error: {0}")]
    Jwks(String),

    #[error("authentication error: {0}")]
    Provider(String),

    #[error("missing code")]
    MissingCode,

    #[error("token exchange failed: {0}")]
    CodeExchange(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::InvalidClaims
            | AuthError::KeyNotFound(_) => 401,
            AuthError::Provider(_) | AuthError::MissingCode => 400,
            AuthError::Jwks(_) | AuthError::CodeExchange(_) | AuthError::Config(_) => 500,
        }
    }

    /// Message safe to return to the client.
    ///
    /// Token failures collapse into fixed strings so verification details
    /// never leak; callback errors echo their reason like the token endpoint
    /// reported it.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::MissingToken => "missing token".to_string(),
            AuthError::InvalidToken(_) | AuthError::KeyNotFound(_) | AuthError::Jwks(_) => {
                "invalid token".to_string()
            }
            AuthError::InvalidClaims => "failed to read claims".to_string(),
            AuthError::Config(_) => "server configuration error".to_string(),
            AuthError::Provider(_) | AuthError::MissingCode | AuthError::CodeExchange(_) => {
                self.to_string()
            }
        }
    }
}
