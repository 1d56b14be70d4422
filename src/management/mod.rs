//! # Management Module
//!
//! High-level management of the secrets and transient state the agent owns:
//!
//! - [`token`] - the single shared agent bearer token (24h lifetime,
//!   format-validated, regenerated on expiry or explicit reset)
//! - [`client`] - the per-user Spotify Client ID (env override, stored value)
//! - [`session`] - the single in-flight PKCE login session slot
//!
//! Everything here operates on the injected [`crate::store::SecretStore`]
//! so tests can run against an in-memory fake instead of the file-backed
//! store in the local data directory.

mod client;
mod session;
mod token;

pub use client::{clear_client_id, get_client_id, set_client_id};
pub use session::SessionSlot;
pub use token::{get_or_create_token, get_token, reset_token};
