mod common;

use std::sync::Arc;

use serde_json::{Value, json};

use uibridge::management;
use uibridge::server::{AppState, build_router};
use uibridge::store::MemoryStore;

async fn spawn_agent() -> (Arc<MemoryStore>, String) {
    let store = Arc::new(MemoryStore::new());
    let base = common::spawn(build_router(AppState::new(store.clone()))).await;
    (store, base)
}

#[tokio::test]
async fn test_health_is_open() {
    let (_store, base) = spawn_agent().await;

    let res = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"].as_str(), Some("ok"));
    assert_eq!(body["name"].as_str(), Some("UI Bridge Agent"));
}

#[tokio::test]
async fn test_ping_requires_header() {
    let (store, base) = spawn_agent().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/v1/ping", base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str(), Some("auth_missing_or_invalid"));

    let res = client
        .get(format!("{}/v1/ping", base))
        .header("X-UIB-Token", "definitely-not-the-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let token = management::get_or_create_token(store.as_ref()).unwrap();
    let res = client
        .get(format!("{}/v1/ping", base))
        .header("X-UIB-Token", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["pong"].as_str(), Some("pong"));
    assert_eq!(
        body["token_last4"].as_str(),
        Some(&token[token.len() - 4..])
    );
}

#[tokio::test]
async fn test_client_id_set_and_clear() {
    let (store, base) = spawn_agent().await;
    let client = reqwest::Client::new();
    let token = management::get_or_create_token(store.as_ref()).unwrap();

    let res = client
        .post(format!("{}/v1/spotify/client-id", base))
        .header("X-UIB-Token", &token)
        .json(&json!({ "op": "set", "client_id": "client123" }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"].as_bool(), Some(true));
    assert_eq!(
        management::get_client_id(store.as_ref()).as_deref(),
        Some("client123")
    );

    let res = client
        .post(format!("{}/v1/spotify/client-id", base))
        .header("X-UIB-Token", &token)
        .json(&json!({ "op": "clear" }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"].as_bool(), Some(true));
    assert_eq!(management::get_client_id(store.as_ref()), None);
}

#[tokio::test]
async fn test_client_id_rejects_bad_requests() {
    let (store, base) = spawn_agent().await;
    let client = reqwest::Client::new();
    let token = management::get_or_create_token(store.as_ref()).unwrap();

    let res = client
        .post(format!("{}/v1/spotify/client-id", base))
        .header("X-UIB-Token", &token)
        .json(&json!({ "op": "frobnicate" }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"].as_bool(), Some(false));
    assert_eq!(body["error"].as_str(), Some("bad_op"));

    let res = client
        .post(format!("{}/v1/spotify/client-id", base))
        .header("X-UIB-Token", &token)
        .json(&json!({ "op": "set", "client_id": "   " }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"].as_bool(), Some(false));
}

#[tokio::test]
async fn test_play_requires_a_query() {
    let (store, base) = spawn_agent().await;
    let client = reqwest::Client::new();
    let token = management::get_or_create_token(store.as_ref()).unwrap();

    let res = client
        .post(format!("{}/v1/spotify/play", base))
        .header("X-UIB-Token", &token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"].as_bool(), Some(false));
    assert_eq!(body["error"].as_str(), Some("missing_query"));
}

#[tokio::test]
async fn test_now_reports_not_linked_without_tokens() {
    let (store, base) = spawn_agent().await;
    let client = reqwest::Client::new();
    let token = management::get_or_create_token(store.as_ref()).unwrap();

    let res = client
        .get(format!("{}/v1/spotify/now", base))
        .header("X-UIB-Token", &token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str(), Some("not_linked"));
}

#[tokio::test]
async fn test_agent_token_reset_invalidates_old_token() {
    let (store, base) = spawn_agent().await;
    let client = reqwest::Client::new();

    let old = management::get_or_create_token(store.as_ref()).unwrap();
    let fresh = management::reset_token(store.as_ref()).unwrap();
    assert_ne!(old, fresh);

    let res = client
        .get(format!("{}/v1/ping", base))
        .header("X-UIB-Token", &old)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = client
        .get(format!("{}/v1/ping", base))
        .header("X-UIB-Token", &fresh)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
}
