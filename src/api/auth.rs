use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};

use crate::{config, error::AgentError, server::AppState, spotify, warning};

const CLIENT_ID_HELP: &str = "<h3>Spotify Client ID missing.</h3>\
<p>Set it with:</p>\
<pre>uib config --set-client-id \"YOUR_CLIENT_ID\"</pre>";

/// Starts the OAuth flow: stores a fresh PKCE session and answers with a
/// minimal redirecting page (the link works even if scripts are blocked).
pub async fn login(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    match spotify::auth::begin_login(
        state.store.as_ref(),
        &state.session,
        &config::spotify_auth_url(),
        &config::spotify_redirect_uri(),
    )
    .await
    {
        Ok(url) => (
            StatusCode::OK,
            Html(format!(
                "<a href=\"{url}\">Continue to Spotify login…</a>\
                 <script>location.href=\"{url}\"</script>"
            )),
        ),
        Err(AgentError::ConfigError) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(CLIENT_ID_HELP.to_string()),
        ),
        Err(e) => {
            warning!("Login initiation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h3>Login failed. Try again.</h3>".to_string()),
            )
        }
    }
}

/// Completes the OAuth flow from Spotify's redirect. The pending session is
/// single use; any failure requires starting the login over.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let result = spotify::auth::complete_login(
        state.store.as_ref(),
        &state.session,
        params.get("code").map(String::as_str),
        params.get("state").map(String::as_str),
        &config::spotify_token_url(),
        &config::spotify_redirect_uri(),
    )
    .await;

    match result {
        Ok(()) => (
            StatusCode::OK,
            Html("<h3>Spotify linked. You can close this tab.</h3>".to_string()),
        ),
        Err(AgentError::ValidationError) => (
            StatusCode::BAD_REQUEST,
            Html("<h3>State or verifier mismatch. Try login again.</h3>".to_string()),
        ),
        Err(AgentError::ConfigError) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(CLIENT_ID_HELP.to_string()),
        ),
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h3>Token exchange failed. Try login again.</h3>".to_string()),
            )
        }
    }
}
