use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// `GET /health`. Always 200; `database` reports whether SQLite answers and
/// `migrations` how much of the embedded schema is applied.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = if state.db.health_check().await {
        "ok"
    } else {
        "unavailable"
    };

    let migrations = match state.db.migration_status().await {
        Ok((total, applied)) => json!({ "applied": applied, "total": total }),
        Err(_) => Value::Null,
    };

    Json(json!({
        "status": "ok",
        "database": database,
        "migrations": migrations,
    }))
}
