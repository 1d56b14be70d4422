use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde_json::Value;

use crate::{
    config, error, info, management,
    server::{AppState, start_agent_server},
    store::FileStore,
    success, warning,
};

/// Runs the agent server in the foreground until interrupted.
pub async fn serve() {
    let store = Arc::new(FileStore::default());

    // Mint the token up front so `uib token --show` works from another shell.
    match management::get_or_create_token(store.as_ref()) {
        Ok(token) => {
            let last4 = &token[token.len().saturating_sub(4)..];
            info!("Agent token ready (…{})", last4);
        }
        Err(e) => error!("Cannot prepare agent token: {}", e),
    }

    start_agent_server(AppState::new(store)).await;
}

/// Shows or resets the local agent token.
pub async fn token(show: bool, reset: bool) {
    let store = FileStore::default();

    if reset {
        match management::reset_token(&store) {
            Ok(t) => success!("Token reset. New token: {}", t),
            Err(e) => error!("Failed to reset token: {}", e),
        }
        return;
    }

    match management::get_or_create_token(&store) {
        Ok(t) => {
            if show {
                info!("Agent token: {}", t);
            } else {
                let last4 = &t[t.len().saturating_sub(4)..];
                info!("Agent token ends in …{} (use --show to print it)", last4);
            }
        }
        Err(e) => error!("Failed to read token: {}", e),
    }
}

/// Checks that the agent is up and that the token authenticates.
pub async fn status() {
    let base = config::agent_base_url();
    let client = match Client::builder().timeout(Duration::from_secs(5)).build() {
        Ok(c) => c,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    let health = client.get(format!("{}/health", base)).send().await;
    match health {
        Ok(r) if r.status().is_success() => info!("Agent is up at {}", base),
        _ => error!("Agent is not responding on {}. Run `uib serve` first.", base),
    }

    let store = FileStore::default();
    let agent_token = match management::get_or_create_token(&store) {
        Ok(t) => t,
        Err(e) => error!("Failed to read token: {}", e),
    };

    let ping = client
        .get(format!("{}/v1/ping", base))
        .header("X-UIB-Token", &agent_token)
        .send()
        .await;
    match ping {
        Ok(r) if r.status().is_success() => {
            let last4 = r
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v["token_last4"].as_str().map(str::to_string))
                .unwrap_or_default();
            success!("Authenticated ping ok (token …{})", last4);
        }
        Ok(r) => warning!(
            "Agent rejected the token (status {}). Try `uib token --reset`.",
            r.status()
        ),
        Err(e) => error!("Ping failed: {}", e),
    }
}
