//! Liveness endpoint.

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// GET /health - Process is up; reports whether the database still answers.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = if state.database.ping().await {
        "ok"
    } else {
        "unavailable"
    };

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    }))
}
