use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use stackies_auth::{callback_routes, require_bearer};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        experiences::{create_experience, list_experiences},
        health::healthz,
        root::root,
    },
    middleware::body_dump,
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let mut experience_routes = Router::new().route(
        "/experiences",
        get(list_experiences).post(create_experience),
    );
    if let Some(verifier) = state.verifier.clone() {
        experience_routes =
            experience_routes.route_layer(middleware::from_fn_with_state(verifier, require_bearer));
    }

    let mut app = Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .merge(experience_routes)
        .with_state(state.clone());

    if let Some(exchanger) = state.exchanger.clone() {
        app = app.merge(callback_routes().with_state(exchanger));
    }

    if let Some(config) = state.body_dump.clone() {
        app = app.layer(middleware::from_fn_with_state(config, body_dump));
    }

    app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(10),
    ))
    .layer(cors)
    .layer(CatchPanicLayer::new())
    .layer(TraceLayer::new_for_http())
}
