use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

/// GET `/health` — liveness plus a database reachability check.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match crate::db::check_connection(&state.db).await {
        Ok(()) => "ok",
        Err(_) => "unreachable",
    };
    Json(json!({ "status": "ok", "database": database }))
}
