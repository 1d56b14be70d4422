//! Configuration management for the UI Bridge agent.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and a `.env` file in the local data directory.
//! Every value has a default so the agent runs unconfigured; environment
//! variables take priority:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `uibridge/.env` in the platform-specific local
/// data directory. A missing `.env` file is not an error since every
/// configuration value has a default.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/uibridge/.env`
/// - macOS: `~/Library/Application Support/uibridge/.env`
/// - Windows: `%LOCALAPPDATA%/uibridge/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("uibridge/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the host the local agent binds to.
///
/// Read from `UIB_HOST`, defaulting to `127.0.0.1`. The agent is meant to be
/// loopback-only; change this with care.
pub fn agent_host() -> String {
    env::var("UIB_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
}

/// Returns the port the local agent listens on.
///
/// Read from `UIB_PORT`, defaulting to `5025` (chosen not to collide with
/// common local services).
pub fn agent_port() -> u16 {
    env::var("UIB_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5025)
}

/// Returns the `host:port` address the server binds to.
pub fn server_addr() -> String {
    format!("{}:{}", agent_host(), agent_port())
}

/// Returns the base URL the CLI uses to reach the agent.
///
/// Read from `UIB_BASE_URL` if set, otherwise derived from the host and port.
pub fn agent_base_url() -> String {
    env::var("UIB_BASE_URL")
        .unwrap_or_else(|_| format!("http://{}:{}", agent_host(), agent_port()))
}

/// Returns the Spotify Client ID from the environment, if set.
///
/// `SPOTIFY_CLIENT_ID` overrides the value stored via
/// `uib config --set-client-id` (useful for CI and development).
pub fn spotify_client_id_env() -> Option<String> {
    env::var("SPOTIFY_CLIENT_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns the Spotify OAuth authorization URL.
///
/// Read from `SPOTIFY_AUTH_URL`, defaulting to the documented Spotify
/// accounts endpoint. Only override for testing against mocks.
pub fn spotify_auth_url() -> String {
    env::var("SPOTIFY_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Read from `SPOTIFY_TOKEN_URL`, defaulting to the documented Spotify
/// accounts endpoint. Used for both the authorization-code exchange and
/// refresh-token requests.
pub fn spotify_token_url() -> String {
    env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Spotify Web API base URL.
///
/// Read from `SPOTIFY_API_URL`, defaulting to `https://api.spotify.com/v1`.
pub fn spotify_api_url() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the OAuth redirect URI registered with the Spotify application.
///
/// Read from `SPOTIFY_REDIRECT_URI`, defaulting to the agent's own callback
/// endpoint. This must match the redirect URI configured in the Spotify
/// developer dashboard.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI").unwrap_or_else(|_| {
        format!(
            "http://{}:{}/auth/spotify/callback",
            agent_host(),
            agent_port()
        )
    })
}
