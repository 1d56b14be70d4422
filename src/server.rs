use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::{
    api, config, error, info, management::{self, SessionSlot}, store::SecretStore, warning,
};

/// Shared state for the agent: the injected secret store and the single
/// in-flight PKCE session slot. Cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SecretStore>,
    pub session: SessionSlot,
}

impl AppState {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        AppState {
            store,
            session: SessionSlot::new(),
        }
    }
}

/// Builds the agent router. Public routes (health, OAuth handshake) are
/// mounted bare; everything under `/v1` sits behind the token middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/v1/ping", get(api::ping))
        .route("/v1/spotify/now", get(api::spotify_now))
        .route("/v1/spotify/play", post(api::spotify_play))
        .route("/v1/spotify/pause", post(api::spotify_pause))
        .route("/v1/spotify/devices", get(api::spotify_devices))
        .route("/v1/spotify/client-id", post(api::spotify_client_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_agent_token,
        ));

    Router::new()
        .route("/health", get(api::health))
        .route("/auth/spotify/login", get(api::login))
        .route("/auth/spotify/callback", get(api::callback))
        .merge(protected)
        .with_state(state)
}

/// Rejects protected requests whose `X-UIB-Token` header does not match the
/// stored agent token.
async fn require_agent_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get("X-UIB-Token")
        .and_then(|v| v.to_str().ok());

    match (header, management::get_or_create_token(state.store.as_ref())) {
        (Some(header), Ok(token)) if header == token => next.run(request).await,
        _ => {
            warning!("Rejected request: missing or invalid X-UIB-Token");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "auth_missing_or_invalid",
                    "message": "Provide X-UIB-Token header. Use `uib token --show` to view it."
                })),
            )
                .into_response()
        }
    }
}

/// Binds the configured address and serves the agent until the process ends.
pub async fn start_agent_server(state: AppState) {
    let app = build_router(state);

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    info!("Agent listening on http://{}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Agent server stopped: {}", e);
    }
}
