use axum::{extract::State, response::Json};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{config, management, server::AppState};

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": "UI Bridge Agent",
        "version": env!("CARGO_PKG_VERSION"),
        "time_utc": Utc::now().to_rfc3339(),
        "port": config::agent_port()
    }))
}

/// Authenticated ping so the CLI can verify secure connectivity. Echoes the
/// last four characters of the agent token for eyeball comparison.
pub async fn ping(State(state): State<AppState>) -> Json<Value> {
    match management::get_or_create_token(state.store.as_ref()) {
        Ok(token) => {
            let last4 = &token[token.len().saturating_sub(4)..];
            Json(json!({ "pong": "pong", "token_last4": last4 }))
        }
        Err(_) => Json(json!({ "error": "store_error" })),
    }
}
