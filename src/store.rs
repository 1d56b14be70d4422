//! Key-value secret store abstraction.
//!
//! Tokens and the Spotify Client ID are small string secrets with a
//! get/set/delete lifecycle. Hiding them behind [`SecretStore`] lets the
//! server and CLI share one file-backed implementation while tests inject an
//! in-memory fake. The trait is synchronous so it stays dyn-compatible and
//! can live behind an `Arc<dyn SecretStore>` in the server state; the values
//! are tiny single-key files, so blocking reads are fine.

use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::Mutex,
};

/// Storage for small named secrets (agent token, OAuth tokens, client id).
pub trait SecretStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), String>;
}

/// File-backed store keeping one file per key under the local data directory.
///
/// Layout: `<data_local_dir>/uibridge/secrets/<key>`. Writes replace the
/// whole file, which the underlying filesystem serializes per key.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        FileStore { root }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        let mut root = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        root.push("uibridge/secrets");
        FileStore { root }
    }
}

impl SecretStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let value = fs::read_to_string(self.key_path(key)).ok()?;
        if value.is_empty() { None } else { Some(value) }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        fs::create_dir_all(&self.root).map_err(|e| e.to_string())?;
        fs::write(self.key_path(key), value).map_err(|e| e.to_string())
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// In-memory store used by tests as a stand-in for the file-backed one.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
