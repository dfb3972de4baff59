/// Liveness and info endpoints
///
/// Both are public: `/` identifies the service, `/health` reports liveness
/// plus store connectivity.

use crate::app::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status ("healthy" or "degraded")
    pub status: String,

    /// Current server time (Unix seconds)
    pub timestamp: i64,

    /// Store status ("connected", "disconnected", "unconfigured")
    pub database: String,
}

/// Root endpoint: service identification
pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "ScribeFlow API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "model": state.generator.model_name(),
    }))
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.stores {
        Some(stores) => match stores.users.ping().await {
            Ok(()) => "connected",
            Err(_) => "disconnected",
        },
        None => "unconfigured",
    };

    Json(HealthResponse {
        status: if database == "disconnected" {
            "degraded".to_string()
        } else {
            "healthy".to_string()
        },
        timestamp: Utc::now().timestamp(),
        database: database.to_string(),
    })
}
