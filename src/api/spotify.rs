use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::{
    management,
    server::AppState,
    spotify::player,
    types::{ClientIdRequest, PlayRequest},
};

/// `GET /v1/spotify/now` - currently playing track in a friendly shape.
pub async fn spotify_now(State(state): State<AppState>) -> Json<Value> {
    match player::now_playing(state.store.as_ref()).await {
        Ok(now) => Json(json!({
            "is_playing": now.is_playing,
            "artist": now.artist,
            "track": now.track
        })),
        Err(e) => Json(json!({ "error": e.tag() })),
    }
}

/// `POST /v1/spotify/play` - search and start playback. Accepts `{"query"}`
/// or the legacy `{"q"}` body.
pub async fn spotify_play(
    State(state): State<AppState>,
    Json(payload): Json<PlayRequest>,
) -> Json<Value> {
    let Some(query) = payload.query() else {
        return Json(json!({ "ok": false, "error": "missing_query" }));
    };
    match player::play_query(state.store.as_ref(), &query).await {
        Ok(()) => Json(json!({ "ok": true })),
        Err(e) => Json(json!({ "ok": false, "error": e.tag() })),
    }
}

/// `POST /v1/spotify/pause` - pause playback where permitted.
pub async fn spotify_pause(State(state): State<AppState>) -> Json<Value> {
    match player::pause(state.store.as_ref()).await {
        Ok(()) => Json(json!({ "ok": true })),
        Err(e) => Json(json!({ "ok": false, "error": e.tag() })),
    }
}

/// `GET /v1/spotify/devices` - diagnostic device listing.
pub async fn spotify_devices(State(state): State<AppState>) -> Json<Value> {
    let devices = player::list_devices(state.store.as_ref()).await;
    Json(json!({ "devices": devices }))
}

/// `POST /v1/spotify/client-id` - set or clear the stored Client ID.
pub async fn spotify_client_id(
    State(state): State<AppState>,
    Json(payload): Json<ClientIdRequest>,
) -> Json<Value> {
    match payload.op.as_str() {
        "set" => {
            let Some(client_id) = payload.client_id.as_deref() else {
                return Json(json!({ "ok": false, "error": "client_id_required" }));
            };
            match management::set_client_id(state.store.as_ref(), client_id) {
                Ok(()) => Json(json!({ "ok": true })),
                Err(_) => Json(json!({ "ok": false, "error": "invalid_client_id" })),
            }
        }
        "clear" => match management::clear_client_id(state.store.as_ref()) {
            Ok(()) => Json(json!({ "ok": true })),
            Err(_) => Json(json!({ "ok": false, "error": "store_error" })),
        },
        _ => Json(json!({ "ok": false, "error": "bad_op" })),
    }
}
