//! services/client/src/session/store.rs
//!
//! The process-wide authentication state container. It is created once at
//! startup, initialized from whatever token is persisted, and mutated only by
//! the login/logout operations. Consumers read point-in-time snapshots.

use std::sync::{Arc, RwLock};

use elevate_core::domain::User;
use elevate_core::ports::{BearerTokenSource, TokenStorage};
use tracing::{error, info, warn};

use crate::session::token::{decode_token, TokenError};

const LOCK_MSG: &str = "session state lock poisoned";

/// A point-in-time view of the session state. A snapshot can go stale as soon
/// as the next login or logout runs; re-read rather than cache it.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub initialized: bool,
    pub authenticated: bool,
    pub user: Option<User>,
}

#[derive(Default)]
struct SessionState {
    initialized: bool,
    user: Option<User>,
    token: Option<String>,
}

//=========================================================================================
// SessionStore
//=========================================================================================

/// The authentication state container, backed by durable token storage.
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Creates the store in its uninitialized state.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Derives the session state from the persisted token, if any. Meant to
    /// be called exactly once at process start; calling it again re-derives
    /// from storage, which is safe but redundant.
    ///
    /// A persisted token that no longer decodes is purged so the next start
    /// comes up cleanly unauthenticated.
    pub fn initialize(&self) {
        if self.state.read().expect(LOCK_MSG).initialized {
            warn!("Session store initialized more than once; re-deriving from storage.");
        }

        let persisted = match self.storage.load() {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to read the persisted token: {}", e);
                None
            }
        };

        let mut state = self.state.write().expect(LOCK_MSG);
        state.initialized = true;
        match persisted {
            None => {
                state.user = None;
                state.token = None;
            }
            Some(token) => match decode_token(&token) {
                Ok(user) => {
                    info!("Restored session for {}.", user.email);
                    state.user = Some(user);
                    state.token = Some(token);
                }
                Err(e) => {
                    warn!("Persisted token is invalid ({}); clearing it.", e);
                    if let Err(clear_err) = self.storage.clear() {
                        error!("Failed to clear the invalid persisted token: {}", clear_err);
                    }
                    state.user = None;
                    state.token = None;
                }
            },
        }
    }

    /// Establishes a session from a token obtained by a prior credential
    /// login. No network round-trip happens here.
    ///
    /// A token that is empty, structurally malformed, or undecodable clears
    /// any persisted token, resets the state to unauthenticated, and
    /// propagates the error so the caller can show a message.
    pub fn login(&self, token: &str) -> Result<User, TokenError> {
        match decode_token(token) {
            Ok(user) => {
                if let Err(e) = self.storage.store(token) {
                    // The session still works in memory; it just won't survive a restart.
                    error!("Failed to persist the session token: {}", e);
                }
                let mut state = self.state.write().expect(LOCK_MSG);
                state.initialized = true;
                state.user = Some(user.clone());
                state.token = Some(token.to_string());
                info!("Logged in as {}.", user.email);
                Ok(user)
            }
            Err(e) => {
                warn!("Rejected login token: {}", e);
                if let Err(clear_err) = self.storage.clear() {
                    error!("Failed to clear the persisted token: {}", clear_err);
                }
                let mut state = self.state.write().expect(LOCK_MSG);
                state.initialized = true;
                state.user = None;
                state.token = None;
                Err(e)
            }
        }
    }

    /// Ends the session: purges the persisted token and resets the state.
    /// Never fails, and calling it twice is the same as calling it once.
    pub fn logout(&self) {
        if let Err(e) = self.storage.clear() {
            error!("Failed to clear the persisted token: {}", e);
        }
        let mut state = self.state.write().expect(LOCK_MSG);
        state.initialized = true;
        state.user = None;
        state.token = None;
        info!("Logged out.");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().expect(LOCK_MSG);
        SessionSnapshot {
            initialized: state.initialized,
            authenticated: state.user.is_some(),
            user: state.user.clone(),
        }
    }
}

impl BearerTokenSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.state.read().expect(LOCK_MSG).token.clone()
    }
}
