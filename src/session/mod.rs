//! Session store.
//!
//! Holds the bearer token and the signed-in staff member, mirrors them into
//! durable storage on every change and rehydrates them at startup.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::errors::PortalError;
use crate::models::User;
use crate::storage::{KeyValueStore, ADMIN_KEY, SESSION_KEY, TOKEN_KEY};

/// Version written into the persisted blob.
const PERSIST_VERSION: u32 = 0;

/// In-memory session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// Token of an authenticated session, if any.
    pub fn bearer(&self) -> Option<&str> {
        if self.is_authenticated {
            self.token.as_deref()
        } else {
            None
        }
    }
}

/// Durable part of the state, as stored under [`SESSION_KEY`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    token: Option<String>,
    user: Option<User>,
    is_authenticated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// Session store shared by the guard, the hooks and the export trigger.
pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            storage,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    /// Bearer token of the active session.
    pub fn token(&self) -> Option<String> {
        self.read().bearer().map(str::to_string)
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().is_loading = loading;
    }

    pub fn set_error(&self, error: impl Into<String>) {
        let mut state = self.write();
        state.error = Some(error.into());
        state.is_loading = false;
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    /// Persist the session, then mark it authenticated.
    ///
    /// Memory only changes once every key is written. A failed write clears
    /// whatever part of the session already reached storage.
    pub async fn login(&self, token: String, user: User) -> Result<(), PortalError> {
        tracing::info!("Signing in {} ({})", user.email, user.role.as_str());

        if let Err(e) = self.persist(&token, &user).await {
            tracing::warn!("Failed to persist session for {}: {}", user.email, e);
            if let Err(e) = self.clear_storage().await {
                tracing::warn!("Failed to clear partial session: {}", e);
            }
            return Err(e);
        }

        let mut state = self.write();
        state.token = Some(token);
        state.user = Some(user);
        state.is_authenticated = true;
        state.is_loading = false;
        state.error = None;

        Ok(())
    }

    async fn persist(&self, token: &str, user: &User) -> Result<(), PortalError> {
        let blob = PersistedSession {
            state: PersistedState {
                token: Some(token.to_string()),
                user: Some(user.clone()),
                is_authenticated: true,
            },
            version: PERSIST_VERSION,
        };

        self.storage.set(TOKEN_KEY, token).await?;
        self.storage
            .set(ADMIN_KEY, &serde_json::to_string(user)?)
            .await?;
        self.storage
            .set(SESSION_KEY, &serde_json::to_string(&blob)?)
            .await?;

        Ok(())
    }

    /// Clear the in-memory state and every durable session key.
    pub async fn logout(&self) -> Result<(), PortalError> {
        if let Some(user) = self.current_user() {
            tracing::info!("Signing out {}", user.email);
        }

        *self.write() = SessionState::default();
        self.clear_storage().await
    }

    /// Rehydrate from durable storage; returns whether a session was restored.
    ///
    /// Unreadable or inconsistent data is discarded rather than reported.
    pub async fn initialize(&self) -> bool {
        self.set_loading(true);

        let restored = match self.load_persisted().await {
            Ok(Some((token, user))) => {
                let mut state = self.write();
                state.token = Some(token);
                state.user = Some(user);
                state.is_authenticated = true;
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Discarding stored session: {}", e);
                if let Err(e) = self.clear_storage().await {
                    tracing::warn!("Failed to clear stored session: {}", e);
                }
                false
            }
        };

        self.set_loading(false);

        if restored {
            tracing::info!("Session restored from storage");
        } else {
            tracing::debug!("No stored session");
        }
        restored
    }

    async fn load_persisted(&self) -> Result<Option<(String, User)>, PortalError> {
        if let Some(raw) = self.storage.get(SESSION_KEY).await? {
            let blob: PersistedSession = serde_json::from_str(&raw)?;
            return match blob.state {
                PersistedState {
                    token: Some(token),
                    user: Some(user),
                    is_authenticated: true,
                } => Ok(Some((token, user))),
                PersistedState {
                    is_authenticated: false,
                    ..
                } => Ok(None),
                _ => Err(PortalError::Storage(
                    "Persisted session is missing its token or user".to_string(),
                )),
            };
        }

        let token = self.storage.get(TOKEN_KEY).await?;
        let admin = self.storage.get(ADMIN_KEY).await?;
        match (token, admin) {
            (Some(token), Some(admin)) => Ok(Some((token, serde_json::from_str(&admin)?))),
            (None, None) => Ok(None),
            _ => Err(PortalError::Storage(
                "Stored token and user are out of sync".to_string(),
            )),
        }
    }

    async fn clear_storage(&self) -> Result<(), PortalError> {
        self.storage.remove(TOKEN_KEY).await?;
        self.storage.remove(ADMIN_KEY).await?;
        self.storage.remove(SESSION_KEY).await?;
        Ok(())
    }
}
