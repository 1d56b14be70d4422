use chrono::Utc;

use crate::{store::SecretStore, utils};

const K_TOKEN: &str = "agent_token";
const K_ISSUED_AT: &str = "agent_token_issued_at";

/// Agent tokens are rotated after 24 hours.
const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Returns the current agent token, minting a fresh one if the stored token
/// is missing, malformed or expired.
///
/// This is what the auth middleware compares the `X-UIB-Token` header
/// against, so a request arriving right after expiry sees the new token.
pub fn get_or_create_token(store: &dyn SecretStore) -> Result<String, String> {
    if let Some(current) = store.get(K_TOKEN) {
        if utils::is_valid_agent_token(&current) && !is_expired(store) {
            return Ok(current);
        }
    }
    mint(store)
}

/// Returns the current agent token only if it is valid and unexpired.
pub fn get_token(store: &dyn SecretStore) -> Option<String> {
    let token = store.get(K_TOKEN)?;
    if utils::is_valid_agent_token(&token) && !is_expired(store) {
        Some(token)
    } else {
        None
    }
}

/// Discards the current agent token and mints a new one.
pub fn reset_token(store: &dyn SecretStore) -> Result<String, String> {
    mint(store)
}

fn mint(store: &dyn SecretStore) -> Result<String, String> {
    let token = utils::generate_agent_token();
    store.set(K_TOKEN, &token)?;
    store.set(K_ISSUED_AT, &Utc::now().timestamp().to_string())?;
    Ok(token)
}

fn is_expired(store: &dyn SecretStore) -> bool {
    let Some(issued_at) = store.get(K_ISSUED_AT).and_then(|v| v.parse::<i64>().ok()) else {
        return true;
    };
    Utc::now().timestamp() - issued_at > TOKEN_LIFETIME_SECS
}
