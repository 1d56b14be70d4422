//! # CLI Module
//!
//! User-facing command implementations for the `uib` binary. The CLI is a
//! thin client of the local agent: apart from `serve` and `token` (which
//! touch the secret store directly), every command is an HTTP call to the
//! agent carrying the `X-UIB-Token` header.
//!
//! ## Commands
//!
//! - [`serve`] - run the local agent server in the foreground
//! - [`token`] - show or reset the shared agent token
//! - [`status`] - check `/health` and the authenticated `/v1/ping`
//! - [`login`] - open the browser on the agent's Spotify OAuth login page
//! - [`play`] / [`pause`] / [`now`] / [`devices`] - playback control
//! - [`client_config`] - set or clear the Spotify Client ID
//!
//! Output goes through the crate's `info!`/`success!`/`warning!`/`error!`
//! macros; `error!` terminates the process, which is the intended behavior
//! for unrecoverable CLI failures (agent unreachable, store unusable).

mod agent;
mod spotify;

pub use agent::{serve, status, token};
pub use spotify::{client_config, devices, login, now, pause, play};
