use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::AppState;

pub async fn ping_handler() -> Json<Value> {
    debug!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "SamStore catalog is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Reports store reachability; 503 when the store cannot be reached.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    match state.catalog.health_check().await {
        Ok(()) => {
            health_status["checks"]["database"] = json!({ "status": "healthy" });
            (StatusCode::OK, Json(health_status))
        }
        Err(e) => {
            warn!(error = %e, "health check failed");
            health_status["status"] = json!("unhealthy");
            health_status["checks"]["database"] = json!({
                "status": "unhealthy",
                "error": e.to_string()
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(health_status))
        }
    }
}
