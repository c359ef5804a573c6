use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and which store backs the session.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let store = if state.config.store_url.is_some() {
        "remote"
    } else {
        "memory"
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "vitae-api",
        "store": store
    }))
}
