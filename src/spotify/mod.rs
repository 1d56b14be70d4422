//! # Spotify Integration Module
//!
//! Client-side integration with the Spotify Web API, split into the two
//! concerns the agent actually has:
//!
//! - [`auth`] - OAuth 2.0 PKCE flow: building the authorize URL, validating
//!   the callback against the pending session, exchanging the authorization
//!   code, persisting the token pair, and refreshing expired access tokens.
//! - [`player`] - playback control: device listing and selection,
//!   ensure-device polling with app launch fallback, transfer, pause with a
//!   single device-recovery retry, search-and-play, and now-playing.
//!
//! ## Design
//!
//! All functions here are adapters over plain HTTP calls. They never panic
//! on provider errors: expected conditions ("not linked", "no device",
//! "premium required", any non-2xx status) come back as
//! [`crate::error::AgentError`] variants that the HTTP layer maps to stable
//! JSON bodies. Network calls use short fixed timeouts and are never retried
//! automatically, with two deliberate exceptions:
//!
//! - the bounded ensure-device poll loop (fixed 500ms cadence, 8s budget by
//!   default, both injectable for tests), and
//! - the single pause retry after resolving a device on a 404.
//!
//! Functions with a `_with` suffix take the API base URL and token as
//! explicit parameters so integration tests can point them at a local mock
//! server; the plain-named wrappers read the configured endpoints and the
//! stored token.

pub mod auth;
pub mod player;

use std::time::Duration;

use reqwest::Client;

use crate::error::AgentError;

pub(crate) fn http_client(timeout: Duration) -> Result<Client, AgentError> {
    Ok(Client::builder().timeout(timeout).build()?)
}
