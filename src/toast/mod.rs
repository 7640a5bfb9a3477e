//! User-facing toast notifications.
//!
//! Mutations and exports push here; the view layer drains the queue.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Oldest toasts are dropped beyond this many.
const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

pub struct ToastQueue {
    toasts: Mutex<VecDeque<Toast>>,
    capacity: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ToastQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            toasts: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = toast.id;

        let mut toasts = self.lock();
        if toasts.len() == self.capacity {
            toasts.pop_front();
        }
        toasts.push_back(toast);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Info, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Error, message)
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.lock().drain(..).collect()
    }

    pub fn pending(&self) -> Vec<Toast> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
