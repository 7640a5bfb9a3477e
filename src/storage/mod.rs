//! Durable client storage.
//!
//! A small key-value contract standing in for browser storage. The session
//! store persists through it; nothing else in the crate writes durable state.

mod sqlite;

pub use sqlite::*;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::PortalError;

/// Raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Serialized current user.
pub const ADMIN_KEY: &str = "admin";
/// Namespaced blob holding the whole persisted session.
pub const SESSION_KEY: &str = "civic-desk-session";

/// Durable string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PortalError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PortalError>;
    async fn remove(&self, key: &str) -> Result<(), PortalError>;
}

/// Process-local storage, used by tests and by callers that opt out of persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PortalError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PortalError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PortalError> {
        self.entries().remove(key);
        Ok(())
    }
}
