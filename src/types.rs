use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// True once the access token is inside the 4 minute expiry buffer.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= self.obtained_at + self.expires_in.saturating_sub(240)
    }
}

/// One in-flight PKCE login attempt. Created at login initiation, consumed
/// exactly once by the OAuth callback, then discarded.
#[derive(Debug, Clone)]
pub struct PkceSession {
    pub state: String,
    pub code_verifier: String,
    pub code_challenge: String,
}

impl PkceSession {
    pub fn generate() -> Self {
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);
        PkceSession {
            state: utils::generate_state(),
            code_verifier,
            code_challenge,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub name: String,
    pub kind: String,
    pub active: String,
}

/// Friendly shape of the currently-playing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowState {
    pub is_playing: bool,
    pub artist: Option<String>,
    pub track: Option<String>,
}

impl NowState {
    pub fn not_playing() -> Self {
        NowState {
            is_playing: false,
            artist: None,
            track: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    pub item: Option<PlayingItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayingItem {
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<ItemArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemArtist {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<SearchTracks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTracks {
    #[serde(default)]
    pub items: Vec<SearchTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchTrack {
    pub uri: Option<String>,
}

/// Body of `POST /v1/spotify/play`. `q` is the legacy alias kept for older
/// CLI builds that still send it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

impl PlayRequest {
    pub fn query(&self) -> Option<String> {
        self.query
            .clone()
            .or_else(|| self.q.clone())
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
    }
}

/// Body of `POST /v1/spotify/client-id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientIdRequest {
    pub op: String,
    #[serde(default)]
    pub client_id: Option<String>,
}
