//! # API Module
//!
//! HTTP handlers for the local agent server. The surface splits into public
//! endpoints and token-protected ones; protection itself is applied by the
//! middleware in [`crate::server`], not here.
//!
//! ## Public endpoints
//!
//! - [`health`] - liveness check with name/version/time/port
//! - [`login`] - starts the Spotify OAuth PKCE flow, returns a redirect page
//! - [`callback`] - completes the flow: validates state, exchanges the code,
//!   stores the token pair, answers with a small HTML page
//!
//! ## Protected endpoints (require the `X-UIB-Token` header)
//!
//! - [`ping`] - authenticated connectivity check for the CLI
//! - [`spotify_now`] - currently-playing state
//! - [`spotify_play`] - search-and-play with automatic device handling
//! - [`spotify_pause`] - pause playback
//! - [`spotify_devices`] - diagnostic device listing
//! - [`spotify_client_id`] - set or clear the stored Spotify Client ID
//!
//! Handlers never panic on provider or store failures; adapter errors are
//! mapped to stable JSON bodies (`{"ok": false, "error": <tag>}` or
//! `{"error": <tag>}`) so clients always get a parseable response.

mod auth;
mod health;
mod spotify;

pub use auth::{callback, login};
pub use health::{health, ping};
pub use spotify::{spotify_client_id, spotify_devices, spotify_now, spotify_pause, spotify_play};
