//! Liveness and readiness probes.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /health
///
/// Verifies database connectivity and reports service status.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    veritas_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
