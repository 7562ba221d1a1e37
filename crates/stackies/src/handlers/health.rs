//! Health check endpoint for Kubernetes-style probes.
//!
//! - `/healthz` - Liveness probe (immediate 200, no checks)

use axum::Json;
use serde_json::{json, Value};

/// GET /healthz - Basic liveness probe.
///
/// Returns 200 immediately. Does not touch storage.
#[axum::debug_handler]
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
