//! Authentication context.
//!
//! Holds the current token and keeps it in sync with the persistent store so
//! that a restart picks up where the user left off.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info};

use crate::{
    store::{KeyValueStore, MemoryStore, StoreError},
    TOKEN_KEY,
};

pub type SharedSession = Arc<RwLock<Session>>;

pub struct Session {
    token: Option<String>,
    store: Box<dyn KeyValueStore>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "(redacted)"))
            .field("store", &"(KeyValueStore)")
            .finish()
    }
}

impl Session {
    /// Create a session with no token. Call [`Session::restore`] to pick up
    /// a previously stored one.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            token: None,
            store: Box::new(store),
        }
    }

    /// Create a session and restore the token right away.
    pub fn restored(store: impl KeyValueStore + 'static) -> Self {
        let mut session = Self::new(store);
        session.restore();
        session
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    /// Load the token from the store. Empty values are ignored.
    pub fn restore(&mut self) -> Option<&str> {
        if let Some(token) = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
            info!("Restored the session token");
            self.token = Some(token);
        }
        self.token.as_deref()
    }

    /// Persist `token` and make it current.
    ///
    /// If the store rejects the token the session stays as it was.
    pub fn login(&mut self, token: impl Into<String>) -> Result<(), StoreError> {
        let token = token.into();
        if let Err(e) = self.store.set(TOKEN_KEY, &token) {
            error!(error = %e, "Error storing the token");
            return Err(e);
        }
        self.token = Some(token);
        info!("Logged in");
        Ok(())
    }

    /// Forget the token in memory and in the store.
    ///
    /// The in-memory token is always cleared, a store failure is only reported.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.token = None;
        info!("Logged out");
        self.store
            .remove(TOKEN_KEY)
            .inspect_err(|e| error!(error = %e, "Error removing the token"))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }
}
