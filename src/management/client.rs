use crate::{config, store::SecretStore};

const K_CLIENT_ID: &str = "spotify_client_id";

/// Saves the Spotify Client ID in the secret store.
pub fn set_client_id(store: &dyn SecretStore, value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Client ID must be a non-empty string.".to_string());
    }
    store.set(K_CLIENT_ID, value)
}

/// Reads the Spotify Client ID.
///
/// The `SPOTIFY_CLIENT_ID` environment variable takes priority over the
/// stored value so CI and development setups work without touching the store.
pub fn get_client_id(store: &dyn SecretStore) -> Option<String> {
    config::spotify_client_id_env().or_else(|| store.get(K_CLIENT_ID))
}

/// Removes the saved Spotify Client ID.
pub fn clear_client_id(store: &dyn SecretStore) -> Result<(), String> {
    store.delete(K_CLIENT_ID)
}
