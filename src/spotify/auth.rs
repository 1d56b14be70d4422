use std::time::Duration;

use chrono::Utc;
use reqwest::Url;
use serde_json::Value;

use crate::{
    config,
    error::AgentError,
    management::{self, SessionSlot},
    store::SecretStore,
    types::{PkceSession, Token},
};

use super::http_client;

/// Scopes requested during login; fixed, playback-control only.
const SCOPES: &str =
    "user-read-playback-state user-modify-playback-state user-read-currently-playing";

/// Store key holding the persisted token pair as JSON.
const K_SPOTIFY_TOKEN: &str = "spotify_token";

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Starts a PKCE login: generates a fresh session, parks it in the single
/// in-flight slot (invalidating any earlier pending login) and returns the
/// Spotify authorize URL to redirect the user to.
///
/// Fails with [`AgentError::ConfigError`] when no Client ID is configured.
pub async fn begin_login(
    store: &dyn SecretStore,
    slot: &SessionSlot,
    auth_url: &str,
    redirect_uri: &str,
) -> Result<String, AgentError> {
    let client_id = management::get_client_id(store).ok_or(AgentError::ConfigError)?;

    let session = PkceSession::generate();
    let url = build_authorize_url(auth_url, &client_id, redirect_uri, &session)?;
    slot.replace(session).await;
    Ok(url)
}

/// Builds the authorize URL for a session (response_type=code, S256).
pub fn build_authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    session: &PkceSession,
) -> Result<String, AgentError> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", SCOPES),
            ("state", &session.state),
            ("code_challenge_method", "S256"),
            ("code_challenge", &session.code_challenge),
            ("show_dialog", "false"),
        ],
    )
    .map_err(|_| AgentError::ConfigError)?;
    Ok(url.into())
}

/// Completes a PKCE login from the OAuth callback parameters.
///
/// The pending session is consumed unconditionally; it is gone afterwards
/// whether or not the exchange succeeds. Missing `code`/`state`, an empty
/// slot, or a state mismatch fail with [`AgentError::ValidationError`]
/// before any token exchange call is made. A successful exchange persists
/// the full token pair; an incomplete response persists nothing.
pub async fn complete_login(
    store: &dyn SecretStore,
    slot: &SessionSlot,
    code: Option<&str>,
    state: Option<&str>,
    token_url: &str,
    redirect_uri: &str,
) -> Result<(), AgentError> {
    // Single use: whatever happens below, the session is spent now.
    let session = slot.take().await;

    let (Some(code), Some(state)) = (
        code.filter(|c| !c.is_empty()),
        state.filter(|s| !s.is_empty()),
    ) else {
        return Err(AgentError::ValidationError);
    };

    let session = session.ok_or(AgentError::ValidationError)?;
    if session.state != state {
        return Err(AgentError::ValidationError);
    }

    let client_id = management::get_client_id(store).ok_or(AgentError::ConfigError)?;
    let token = exchange_code_pkce(
        token_url,
        &client_id,
        redirect_uri,
        code,
        &session.code_verifier,
    )
    .await?;

    save_token(store, &token).map_err(AgentError::Store)
}

/// Exchanges an authorization code for an access/refresh token pair.
///
/// A non-success HTTP status or a response missing either token surfaces as
/// [`AgentError::ExchangeFailed`]; no partial token pair is ever returned.
pub async fn exchange_code_pkce(
    token_url: &str,
    client_id: &str,
    redirect_uri: &str,
    code: &str,
    verifier: &str,
) -> Result<Token, AgentError> {
    let client = http_client(EXCHANGE_TIMEOUT)?;
    let res = client
        .post(token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        return Err(AgentError::ExchangeFailed(status.as_u16()));
    }

    let json: Value = res.json().await?;
    let access_token = json["access_token"].as_str().unwrap_or_default();
    let refresh_token = json["refresh_token"].as_str().unwrap_or_default();
    if access_token.is_empty() || refresh_token.is_empty() {
        return Err(AgentError::ExchangeFailed(status.as_u16()));
    }

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Refreshes an expired access token using the stored refresh token.
///
/// Spotify may rotate the refresh token; when the response omits one, the
/// previous refresh token is carried forward.
pub async fn refresh_token(
    token_url: &str,
    client_id: &str,
    refresh: &str,
) -> Result<Token, AgentError> {
    let client = http_client(EXCHANGE_TIMEOUT)?;
    let res = client
        .post(token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh),
            ("client_id", client_id),
        ])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        return Err(AgentError::ExchangeFailed(status.as_u16()));
    }

    let json: Value = res.json().await?;
    let access_token = json["access_token"].as_str().unwrap_or_default();
    if access_token.is_empty() {
        return Err(AgentError::ExchangeFailed(status.as_u16()));
    }

    let rotated = json["refresh_token"].as_str().unwrap_or(refresh);
    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: rotated.to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

pub fn save_token(store: &dyn SecretStore, token: &Token) -> Result<(), String> {
    let json = serde_json::to_string(token).map_err(|e| e.to_string())?;
    store.set(K_SPOTIFY_TOKEN, &json)
}

pub fn load_token(store: &dyn SecretStore) -> Option<Token> {
    let json = store.get(K_SPOTIFY_TOKEN)?;
    serde_json::from_str(&json).ok()
}

/// Returns an access token ready for API calls, refreshing it first when it
/// is about to expire. Returns `None` when no account is linked; never makes
/// a network call in that case.
pub async fn valid_access_token(store: &dyn SecretStore) -> Option<String> {
    let mut token = load_token(store)?;

    if token.is_expired() {
        if let Some(client_id) = management::get_client_id(store) {
            if let Ok(fresh) = refresh_token(
                &config::spotify_token_url(),
                &client_id,
                &token.refresh_token,
            )
            .await
            {
                let _ = save_token(store, &fresh);
                token = fresh;
            }
        }
    }

    Some(token.access_token)
}
