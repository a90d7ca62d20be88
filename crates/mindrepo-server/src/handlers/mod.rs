//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod commits;
pub mod insights;

use axum::Json;

// Re-export all handlers for use in router
pub use commits::*;
pub use insights::*;

/// GET /health - Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
