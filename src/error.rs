//! Error taxonomy shared by the Spotify adapters and the HTTP handlers.
//!
//! Adapter functions return these variants instead of panicking; the HTTP
//! layer maps every variant to a stable JSON error tag via [`AgentError::tag`]
//! so nothing crashes the agent process and no stack traces leak to clients.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// No Spotify access token is stored; the user has not linked an account.
    #[error("spotify account not linked")]
    NotLinked,

    /// No Spotify Client ID is configured (neither env nor stored).
    #[error("spotify client id is not configured")]
    ConfigError,

    /// OAuth callback state/PKCE validation failed (missing or mismatched).
    #[error("oauth state or PKCE session mismatch")]
    ValidationError,

    /// The token endpoint rejected the code exchange or returned an
    /// incomplete token pair.
    #[error("token exchange failed (status {0})")]
    ExchangeFailed(u16),

    /// Spotify returned 403 on a playback call; controlling playback
    /// requires a Premium account.
    #[error("playback control requires spotify premium")]
    PremiumRequired,

    /// No playback device could be resolved within the wait budget.
    #[error("no playback device became available")]
    DeviceUnavailable,

    /// A track search returned no usable result.
    #[error("no matching track found")]
    NoMatch,

    /// Transferring playback to the resolved device was rejected.
    #[error("transferring playback to the device failed")]
    TransferFailed,

    /// Any other non-2xx status from the Spotify Web API.
    #[error("spotify returned status {0}")]
    Provider(u16),

    /// Network-level failure (timeout, connect error, malformed body).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The secret store rejected a read or write.
    #[error("secret store error: {0}")]
    Store(String),
}

impl AgentError {
    /// Stable machine-readable tag used in JSON error bodies.
    pub fn tag(&self) -> String {
        match self {
            AgentError::NotLinked => "not_linked".to_string(),
            AgentError::ConfigError => "client_id_missing".to_string(),
            AgentError::ValidationError => "state_mismatch".to_string(),
            AgentError::ExchangeFailed(_) => "exchange_failed".to_string(),
            AgentError::PremiumRequired => "premium_required".to_string(),
            AgentError::DeviceUnavailable => "no_device".to_string(),
            AgentError::NoMatch => "no_match".to_string(),
            AgentError::TransferFailed => "transfer_failed".to_string(),
            AgentError::Provider(status) => format!("spotify_{}", status),
            AgentError::Http(_) => "network_error".to_string(),
            AgentError::Store(_) => "store_error".to_string(),
        }
    }
}
