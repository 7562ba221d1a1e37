//! Experience CRUD handlers.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::{
    handlers::AppError,
    models::{CreateExperienceRequest, ExperienceResponse},
    state::AppState,
};

/// Handler for POST /experiences
///
/// Binding failures (bad JSON, wrong content type, non-string title) are
/// reported as 400 instead of axum's default 415/422.
#[axum::debug_handler]
pub async fn create_experience(
    State(state): State<AppState>,
    payload: Result<Json<CreateExperienceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateExperienceRequest>), AppError> {
    let Json(request) = payload?;

    state.experiences.create(&request.title).await?;
    tracing::info!(title = %request.title, "Experience created");

    Ok((StatusCode::CREATED, Json(request)))
}

/// Handler for GET /experiences
#[axum::debug_handler]
pub async fn list_experiences(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExperienceResponse>>, AppError> {
    let experiences = state.experiences.list().await?;

    Ok(Json(
        experiences
            .into_iter()
            .map(ExperienceResponse::from)
            .collect(),
    ))
}
