mod common;

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use reqwest::Client;
use serde_json::{Value, json};

use uibridge::error::AgentError;
use uibridge::spotify::player::{
    ensure_device, get_devices, now_playing_with, pause_with, play_query_with,
};
use uibridge::types::NowState;

const WAIT: Duration = Duration::from_millis(500);
const INTERVAL: Duration = Duration::from_millis(50);

/// Scripted Spotify Web API stand-in. Records every call so tests can assert
/// on ordering, and can be told to misbehave in specific ways.
#[derive(Default)]
struct Mock {
    calls: Vec<String>,
    empty_device_responses: usize,
    transferred: bool,
    fail_transfer: bool,
    pause_needs_device: bool,
    empty_search: bool,
    last_transfer_play: Option<bool>,
    played_uris: Vec<String>,
}

type Shared = Arc<Mutex<Mock>>;

fn provider(mock: Shared) -> Router {
    Router::new()
        .route("/me/player/devices", get(devices_handler))
        .route("/me/player", put(transfer_handler))
        .route("/me/player/pause", put(pause_handler))
        .route("/me/player/play", put(play_handler))
        .route("/search", get(search_handler))
        .with_state(mock)
}

async fn devices_handler(State(mock): State<Shared>) -> Json<Value> {
    let mut mock = mock.lock().unwrap();
    mock.calls.push("devices".to_string());
    if mock.empty_device_responses > 0 {
        mock.empty_device_responses -= 1;
        return Json(json!({ "devices": [] }));
    }
    Json(json!({
        "devices": [
            { "id": "dev1", "name": "Desk", "type": "Computer", "is_active": true }
        ]
    }))
}

async fn transfer_handler(State(mock): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let mut mock = mock.lock().unwrap();
    mock.calls.push("transfer".to_string());
    if mock.fail_transfer {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    mock.transferred = true;
    mock.last_transfer_play = body["play"].as_bool();
    StatusCode::NO_CONTENT
}

async fn pause_handler(State(mock): State<Shared>) -> StatusCode {
    let mut mock = mock.lock().unwrap();
    mock.calls.push("pause".to_string());
    if mock.pause_needs_device && !mock.transferred {
        return StatusCode::NOT_FOUND;
    }
    StatusCode::NO_CONTENT
}

async fn play_handler(State(mock): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    let mut mock = mock.lock().unwrap();
    mock.calls.push("play".to_string());
    if let Some(uri) = body["uris"][0].as_str() {
        mock.played_uris.push(uri.to_string());
    }
    StatusCode::NO_CONTENT
}

async fn search_handler(State(mock): State<Shared>) -> Json<Value> {
    let mut mock = mock.lock().unwrap();
    mock.calls.push("search".to_string());
    if mock.empty_search {
        return Json(json!({ "tracks": { "items": [] } }));
    }
    Json(json!({
        "tracks": { "items": [ { "uri": "spotify:track:abc", "name": "Song" } ] }
    }))
}

async fn spawn_mock(mock: Mock) -> (Shared, String) {
    let shared = Arc::new(Mutex::new(mock));
    let base = common::spawn(provider(shared.clone())).await;
    (shared, base)
}

#[tokio::test]
async fn test_now_playing_204_means_not_playing() {
    let app = Router::new().route(
        "/me/player/currently-playing",
        get(|| async { StatusCode::NO_CONTENT }),
    );
    let base = common::spawn(app).await;

    let now = now_playing_with(&Client::new(), &base, "tok").await.unwrap();
    assert_eq!(now, NowState::not_playing());
}

#[tokio::test]
async fn test_now_playing_403_means_premium_required() {
    let app = Router::new().route(
        "/me/player/currently-playing",
        get(|| async { StatusCode::FORBIDDEN }),
    );
    let base = common::spawn(app).await;

    let err = now_playing_with(&Client::new(), &base, "tok")
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::PremiumRequired));
}

#[tokio::test]
async fn test_now_playing_tags_other_statuses() {
    let app = Router::new().route(
        "/me/player/currently-playing",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let base = common::spawn(app).await;

    let err = now_playing_with(&Client::new(), &base, "tok")
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Provider(502)));
    assert_eq!(err.tag(), "spotify_502");
}

#[tokio::test]
async fn test_now_playing_joins_artist_names() {
    let app = Router::new().route(
        "/me/player/currently-playing",
        get(|| async {
            Json(json!({
                "is_playing": true,
                "item": {
                    "name": "Around the World",
                    "artists": [ { "name": "Daft Punk" }, { "name": "Someone" } ]
                }
            }))
        }),
    );
    let base = common::spawn(app).await;

    let now = now_playing_with(&Client::new(), &base, "tok").await.unwrap();
    assert!(now.is_playing);
    assert_eq!(now.track.as_deref(), Some("Around the World"));
    assert_eq!(now.artist.as_deref(), Some("Daft Punk, Someone"));
}

#[tokio::test]
async fn test_get_devices_empty_on_error_status() {
    let app = Router::new().route(
        "/me/player/devices",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = common::spawn(app).await;

    let devices = get_devices(&Client::new(), &base, "tok").await;
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_ensure_device_polls_until_one_appears() {
    let (shared, base) = spawn_mock(Mock {
        empty_device_responses: 2,
        ..Default::default()
    })
    .await;

    let id = ensure_device(&Client::new(), &base, "tok", WAIT, INTERVAL).await;
    assert_eq!(id, Some("dev1".to_string()));

    // Initial probe plus at least two polls
    let calls = shared.lock().unwrap().calls.clone();
    assert!(calls.iter().filter(|c| *c == "devices").count() >= 3);
}

#[tokio::test]
async fn test_ensure_device_gives_up_after_budget() {
    let (_shared, base) = spawn_mock(Mock {
        empty_device_responses: 1000,
        ..Default::default()
    })
    .await;

    let id = ensure_device(
        &Client::new(),
        &base,
        "tok",
        Duration::from_millis(200),
        INTERVAL,
    )
    .await;
    assert_eq!(id, None);
}

#[tokio::test]
async fn test_pause_recovers_from_missing_device_once() {
    let (shared, base) = spawn_mock(Mock {
        pause_needs_device: true,
        ..Default::default()
    })
    .await;

    let result = pause_with(&Client::new(), &base, "tok", WAIT, INTERVAL).await;
    assert!(result.is_ok());

    let mock = shared.lock().unwrap();
    // 404 → resolve device → transfer without starting playback → retry once
    assert_eq!(
        mock.calls,
        vec!["pause", "devices", "transfer", "pause"]
    );
    assert_eq!(mock.last_transfer_play, Some(false));
}

#[tokio::test]
async fn test_play_query_runs_steps_in_order() {
    let (shared, base) = spawn_mock(Mock::default()).await;

    let result =
        play_query_with(&Client::new(), &base, "tok", "daft punk", WAIT, INTERVAL).await;
    assert!(result.is_ok());

    let mock = shared.lock().unwrap();
    assert_eq!(mock.calls, vec!["devices", "search", "transfer", "play"]);
    assert_eq!(mock.last_transfer_play, Some(true));
    assert_eq!(mock.played_uris, vec!["spotify:track:abc"]);
}

#[tokio::test]
async fn test_play_query_fails_fast_without_device() {
    let (shared, base) = spawn_mock(Mock {
        empty_device_responses: 1000,
        ..Default::default()
    })
    .await;

    let err = play_query_with(
        &Client::new(),
        &base,
        "tok",
        "daft punk",
        Duration::from_millis(200),
        INTERVAL,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AgentError::DeviceUnavailable));

    // Search must never run when device resolution timed out
    let calls = shared.lock().unwrap().calls.clone();
    assert!(!calls.contains(&"search".to_string()));
}

#[tokio::test]
async fn test_play_query_never_plays_after_failed_transfer() {
    let (shared, base) = spawn_mock(Mock {
        fail_transfer: true,
        ..Default::default()
    })
    .await;

    let err = play_query_with(&Client::new(), &base, "tok", "daft punk", WAIT, INTERVAL)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::TransferFailed));

    let calls = shared.lock().unwrap().calls.clone();
    assert!(!calls.contains(&"play".to_string()));
}

#[tokio::test]
async fn test_play_query_reports_no_match() {
    let (shared, base) = spawn_mock(Mock {
        empty_search: true,
        ..Default::default()
    })
    .await;

    let err = play_query_with(&Client::new(), &base, "tok", "gibberish", WAIT, INTERVAL)
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::NoMatch));

    let calls = shared.lock().unwrap().calls.clone();
    assert!(!calls.contains(&"transfer".to_string()));
}
