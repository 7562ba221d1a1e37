use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Auth errors for the stackies_auth crate.
///
/// This wraps the core `AuthError` and adds crate-specific error variants
/// for I/O operations that can't be in the functional core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (token checks, callback validation).
    #[error(transparent)]
    Core(#[from] stackies_core::auth::AuthError),

    /// HTTP client error while talking to the key or token endpoint.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl AuthError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        AuthError::Core(stackies_core::auth::AuthError::Config(message.into()))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Core(core_err) => {
                let status = StatusCode::from_u16(core_err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!("Auth error: {}", self);
                } else {
                    tracing::debug!("Auth rejected: {}", self);
                }
                (status, core_err.public_message())
            }
            AuthError::Http(_) => {
                tracing::error!("HTTP error during auth: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "authentication provider error".to_string(),
                )
            }
        };

        (status, Json(message)).into_response()
    }
}
