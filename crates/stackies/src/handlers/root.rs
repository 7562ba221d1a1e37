//! Root route handler.

use axum::Json;
use serde_json::{json, Value};

/// Handler for GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Stackies API" }))
}
