use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use stackies_core::experience::ExperienceError;
use stackies_core::storage::{repository_error_to_status_code, RepositoryError};

/// Handler error. The body is the error text as a JSON string.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        let code = if self.0.downcast_ref::<JsonRejection>().is_some() {
            400
        } else if let Some(err) = self.0.downcast_ref::<ExperienceError>() {
            err.status_code()
        } else if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(err)
        } else {
            500
        };

        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let message = self.0.to_string();

        if status_code.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        } else {
            tracing::debug!(error = %message, "Request rejected");
        }

        (status_code, Json(message)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
