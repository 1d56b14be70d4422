use std::sync::Arc;

use tokio::sync::Mutex;

use crate::types::PkceSession;

/// Holder for the single in-flight PKCE login session.
///
/// The agent deliberately keeps exactly one pending login: starting a new
/// login replaces (and thereby invalidates) any earlier attempt, and the
/// OAuth callback consumes the slot exactly once whether or not the
/// subsequent token exchange succeeds.
#[derive(Clone, Default)]
pub struct SessionSlot {
    inner: Arc<Mutex<Option<PkceSession>>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new pending session, dropping any previous one.
    pub async fn replace(&self, session: PkceSession) {
        let mut slot = self.inner.lock().await;
        *slot = Some(session);
    }

    /// Removes and returns the pending session, if any.
    pub async fn take(&self) -> Option<PkceSession> {
        let mut slot = self.inner.lock().await;
        slot.take()
    }
}
