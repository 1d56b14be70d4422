use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde_json::{Value, json};
use tabled::Table;

use crate::{
    config, error, info, management,
    store::FileStore,
    success,
    types::{DeviceTableRow, DevicesResponse},
    warning,
};

// The play endpoint may poll for a device for up to 8 seconds server-side,
// so its client timeout is generous; everything else stays short.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const PLAY_TIMEOUT: Duration = Duration::from_secs(20);

fn agent_client(timeout: Duration) -> (Client, String, String) {
    let store = FileStore::default();
    let token = match management::get_or_create_token(&store) {
        Ok(t) => t,
        Err(e) => error!("Failed to read agent token: {}", e),
    };
    let client = match Client::builder().timeout(timeout).build() {
        Ok(c) => c,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };
    (client, config::agent_base_url(), token)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Opens the agent's Spotify login page in the default browser.
pub async fn login() {
    let url = format!("{}/auth/spotify/login", config::agent_base_url());
    if webbrowser::open(&url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        )
    } else {
        info!("Complete the login in your browser, then check `uib now`.");
    }
}

/// Searches for a track and starts playback through the agent.
pub async fn play(query: String) {
    let (client, base, token) = agent_client(PLAY_TIMEOUT);

    let pb = spinner("Resolving a playback device...");
    let res = client
        .post(format!("{}/v1/spotify/play", base))
        .header("X-UIB-Token", &token)
        .json(&json!({ "query": query }))
        .send()
        .await;
    pb.finish_and_clear();

    match parse_ok(res).await {
        Ok(()) => success!("Playing top match for \"{}\"", query),
        Err(tag) => warning!("Could not start playback ({})", tag),
    }
}

/// Pauses playback through the agent.
pub async fn pause() {
    let (client, base, token) = agent_client(PLAY_TIMEOUT);

    let res = client
        .post(format!("{}/v1/spotify/pause", base))
        .header("X-UIB-Token", &token)
        .send()
        .await;

    match parse_ok(res).await {
        Ok(()) => success!("Playback paused."),
        Err(tag) => warning!("Could not pause playback ({})", tag),
    }
}

/// Shows the currently playing track.
pub async fn now() {
    let (client, base, token) = agent_client(DEFAULT_TIMEOUT);

    let res = client
        .get(format!("{}/v1/spotify/now", base))
        .header("X-UIB-Token", &token)
        .send()
        .await;

    let body = match res {
        Ok(r) => r.json::<Value>().await.unwrap_or_else(|_| json!({})),
        Err(e) => error!("Agent request failed: {}", e),
    };

    if let Some(err) = body["error"].as_str() {
        if err == "not_linked" {
            warning!("Spotify is not linked yet. Run `uib login` first.");
        } else {
            warning!("Could not read playback state ({})", err);
        }
        return;
    }

    let is_playing = body["is_playing"].as_bool().unwrap_or(false);
    let track = body["track"].as_str().unwrap_or("unknown track");
    match body["artist"].as_str() {
        Some(artist) if is_playing => success!("Now playing: {} by {}", track, artist),
        _ if is_playing => success!("Now playing: {}", track),
        _ => info!("Nothing is playing right now."),
    }
}

/// Lists the playback devices Spotify reports for the linked account.
pub async fn devices() {
    let (client, base, token) = agent_client(DEFAULT_TIMEOUT);

    let res = client
        .get(format!("{}/v1/spotify/devices", base))
        .header("X-UIB-Token", &token)
        .send()
        .await;

    let devices = match res {
        Ok(r) => r
            .json::<DevicesResponse>()
            .await
            .map(|d| d.devices)
            .unwrap_or_default(),
        Err(e) => error!("Agent request failed: {}", e),
    };

    if devices.is_empty() {
        info!("No devices found. Open Spotify on a device or run `uib login`.");
        return;
    }

    let table_rows: Vec<DeviceTableRow> = devices
        .into_iter()
        .map(|d| DeviceTableRow {
            name: d.name,
            kind: d.kind,
            active: if d.is_active { "yes" } else { "" }.to_string(),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}

/// Sets or clears the Spotify Client ID through the agent.
pub async fn client_config(set_client_id: Option<String>, clear: bool) {
    let (client, base, token) = agent_client(DEFAULT_TIMEOUT);

    if clear {
        let res = client
            .post(format!("{}/v1/spotify/client-id", base))
            .header("X-UIB-Token", &token)
            .json(&json!({ "op": "clear" }))
            .send()
            .await;
        match parse_ok(res).await {
            Ok(()) => success!("Client ID cleared."),
            Err(tag) => warning!("Could not clear Client ID ({})", tag),
        }
        return;
    }

    if let Some(client_id) = set_client_id {
        let res = client
            .post(format!("{}/v1/spotify/client-id", base))
            .header("X-UIB-Token", &token)
            .json(&json!({ "op": "set", "client_id": client_id }))
            .send()
            .await;
        match parse_ok(res).await {
            Ok(()) => success!("Client ID saved. Run `uib login` to link Spotify."),
            Err(tag) => warning!("Could not save Client ID ({})", tag),
        }
        return;
    }

    info!("Nothing to do. Use --set-client-id or --clear.");
}

async fn parse_ok(res: Result<reqwest::Response, reqwest::Error>) -> Result<(), String> {
    let res = match res {
        Ok(r) => r,
        Err(e) => error!("Agent request failed: {}", e),
    };
    if res.status().as_u16() == 401 {
        error!("Agent rejected the token. Try `uib token --reset` and restart the agent.");
    }
    let body = res.json::<Value>().await.unwrap_or_else(|_| json!({}));
    if body["ok"].as_bool().unwrap_or(false) {
        Ok(())
    } else {
        Err(body["error"].as_str().unwrap_or("unknown").to_string())
    }
}
