use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint
///
/// Returns the health status of the server and blob store.
/// Used by load balancers and monitoring systems.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let storage_status = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!("Blob store health check failed: {:?}", e);
            "disconnected"
        }
    };

    Json(json!({
        "status": if storage_status == "connected" { "healthy" } else { "unhealthy" },
        "storage": storage_status,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
