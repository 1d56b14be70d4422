use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tokio::time::{Instant, sleep};

use crate::{
    config,
    error::AgentError,
    store::SecretStore,
    types::{CurrentlyPlayingResponse, Device, DevicesResponse, NowState, SearchResponse},
    utils,
};

use super::{auth, http_client};

/// Default budget for waiting on a playback device to appear.
pub const DEVICE_WAIT: Duration = Duration::from_secs(8);

/// Fixed cadence of the device poll loop. No backoff, no jitter.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

const PLAYER_TIMEOUT: Duration = Duration::from_secs(10);
const PLAY_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches the available playback devices. Any non-200 response or decode
/// failure yields an empty list; this function never fails loudly.
pub async fn get_devices(client: &Client, api_base: &str, token: &str) -> Vec<Device> {
    let res = client
        .get(format!("{}/me/player/devices", api_base))
        .bearer_auth(token)
        .send()
        .await;

    let Ok(res) = res else {
        return Vec::new();
    };
    if res.status().as_u16() != 200 {
        return Vec::new();
    }
    res.json::<DevicesResponse>()
        .await
        .map(|d| d.devices)
        .unwrap_or_default()
}

/// Picks the playback target: an active device first, then any "computer"
/// device, then the first device listed. Deterministic for a given ordering.
pub fn pick_device(devices: &[Device]) -> Option<String> {
    if let Some(d) = devices.iter().find(|d| d.is_active) {
        return d.id.clone();
    }
    if let Some(d) = devices
        .iter()
        .find(|d| d.kind.eq_ignore_ascii_case("computer"))
    {
        return d.id.clone();
    }
    devices.first().and_then(|d| d.id.clone())
}

/// Resolves a usable device id, launching the Spotify app and polling for up
/// to `wait` when none is available. Blocks the caller for up to the full
/// budget; the interval and budget are parameters so tests can shrink them.
pub async fn ensure_device(
    client: &Client,
    api_base: &str,
    token: &str,
    wait: Duration,
    interval: Duration,
) -> Option<String> {
    if let Some(id) = pick_device(&get_devices(client, api_base, token).await) {
        return Some(id);
    }

    launch_spotify_app();

    let deadline = Instant::now() + wait;
    while Instant::now() < deadline {
        sleep(interval).await;
        if let Some(id) = pick_device(&get_devices(client, api_base, token).await) {
            return Some(id);
        }
    }
    None
}

// Best-effort wake of the Spotify app; treated as an opaque external action
// that may silently fail (no app installed, headless host).
fn launch_spotify_app() {
    #[cfg(target_os = "windows")]
    {
        // The spotify: URI handler wakes the Store version of the app.
        let _ = std::process::Command::new("cmd")
            .args(["/C", "start", "", "spotify:"])
            .spawn();
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = std::process::Command::new("spotify").spawn();
    }
}

/// Transfers playback to `device_id`. Success iff Spotify answers 200 or 204.
pub async fn transfer_playback(
    client: &Client,
    api_base: &str,
    token: &str,
    device_id: &str,
    play: bool,
) -> bool {
    let res = client
        .put(format!("{}/me/player", api_base))
        .bearer_auth(token)
        .json(&json!({ "device_ids": [device_id], "play": play }))
        .send()
        .await;

    match res {
        Ok(r) => matches!(r.status().as_u16(), 200 | 204),
        Err(_) => false,
    }
}

pub async fn now_playing_with(
    client: &Client,
    api_base: &str,
    token: &str,
) -> Result<NowState, AgentError> {
    let res = client
        .get(format!("{}/me/player/currently-playing", api_base))
        .bearer_auth(token)
        .send()
        .await?;

    match res.status().as_u16() {
        204 => Ok(NowState::not_playing()),
        403 => Err(AgentError::PremiumRequired),
        200 => {
            let body: CurrentlyPlayingResponse = res.json().await?;
            let (artist, track) = match body.item {
                Some(item) => {
                    let names: Vec<String> =
                        item.artists.into_iter().map(|a| a.name).collect();
                    (utils::join_artist_names(&names), item.name)
                }
                None => (None, None),
            };
            Ok(NowState {
                is_playing: body.is_playing,
                artist,
                track,
            })
        }
        status => Err(AgentError::Provider(status)),
    }
}

/// Pauses playback.
///
/// A 404 means no active device: resolve one, transfer playback to it
/// without starting anything, then retry the pause exactly once. That is
/// the only recovery attempt.
pub async fn pause_with(
    client: &Client,
    api_base: &str,
    token: &str,
    wait: Duration,
    interval: Duration,
) -> Result<(), AgentError> {
    let res = client
        .put(format!("{}/me/player/pause", api_base))
        .bearer_auth(token)
        .send()
        .await?;

    match res.status().as_u16() {
        200 | 204 => Ok(()),
        403 => Err(AgentError::PremiumRequired),
        404 => {
            let device_id = ensure_device(client, api_base, token, wait, interval)
                .await
                .ok_or(AgentError::DeviceUnavailable)?;
            if !transfer_playback(client, api_base, token, &device_id, false).await {
                return Err(AgentError::TransferFailed);
            }
            let retry = client
                .put(format!("{}/me/player/pause", api_base))
                .bearer_auth(token)
                .send()
                .await?;
            match retry.status().as_u16() {
                200 | 204 => Ok(()),
                status => Err(AgentError::Provider(status)),
            }
        }
        status => Err(AgentError::Provider(status)),
    }
}

/// Searches for the top track matching `query` and starts playing it.
///
/// Strictly sequential: device resolution, then search, then transfer, then
/// play. The first failing step short-circuits the rest.
pub async fn play_query_with(
    client: &Client,
    api_base: &str,
    token: &str,
    query: &str,
    wait: Duration,
    interval: Duration,
) -> Result<(), AgentError> {
    let device_id = ensure_device(client, api_base, token, wait, interval)
        .await
        .ok_or(AgentError::DeviceUnavailable)?;

    let res = client
        .get(format!("{}/search", api_base))
        .bearer_auth(token)
        .query(&[("q", query), ("type", "track"), ("limit", "1")])
        .send()
        .await?;
    match res.status().as_u16() {
        200 => {}
        403 => return Err(AgentError::PremiumRequired),
        status => return Err(AgentError::Provider(status)),
    }

    let body: SearchResponse = res.json().await?;
    let uri = body
        .tracks
        .and_then(|t| t.items.into_iter().next())
        .and_then(|t| t.uri)
        .ok_or(AgentError::NoMatch)?;

    if !transfer_playback(client, api_base, token, &device_id, true).await {
        return Err(AgentError::TransferFailed);
    }

    let res = client
        .put(format!("{}/me/player/play", api_base))
        .bearer_auth(token)
        .json(&json!({ "uris": [uri] }))
        .send()
        .await?;
    match res.status().as_u16() {
        200 | 204 => Ok(()),
        403 => Err(AgentError::PremiumRequired),
        status => Err(AgentError::Provider(status)),
    }
}

/// Diagnostic helper listing the available devices for the linked account.
/// Missing link or any provider failure yields an empty list.
pub async fn list_devices(store: &dyn SecretStore) -> Vec<Device> {
    let Some(token) = auth::valid_access_token(store).await else {
        return Vec::new();
    };
    let Ok(client) = http_client(PLAYER_TIMEOUT) else {
        return Vec::new();
    };
    get_devices(&client, &config::spotify_api_url(), &token).await
}

pub async fn now_playing(store: &dyn SecretStore) -> Result<NowState, AgentError> {
    let token = auth::valid_access_token(store)
        .await
        .ok_or(AgentError::NotLinked)?;
    let client = http_client(PLAYER_TIMEOUT)?;
    now_playing_with(&client, &config::spotify_api_url(), &token).await
}

pub async fn pause(store: &dyn SecretStore) -> Result<(), AgentError> {
    let token = auth::valid_access_token(store)
        .await
        .ok_or(AgentError::NotLinked)?;
    let client = http_client(PLAYER_TIMEOUT)?;
    pause_with(
        &client,
        &config::spotify_api_url(),
        &token,
        DEVICE_WAIT,
        POLL_INTERVAL,
    )
    .await
}

pub async fn play_query(store: &dyn SecretStore, query: &str) -> Result<(), AgentError> {
    let token = auth::valid_access_token(store)
        .await
        .ok_or(AgentError::NotLinked)?;
    let client = http_client(PLAY_TIMEOUT)?;
    play_query_with(
        &client,
        &config::spotify_api_url(),
        &token,
        query,
        DEVICE_WAIT,
        POLL_INTERVAL,
    )
    .await
}
