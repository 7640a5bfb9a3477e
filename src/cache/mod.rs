//! Query cache.
//!
//! Cached reads keyed by resource, filters, language and auth state. Identical
//! concurrent reads share one request; mutations mark whole resources stale
//! through the table in [`invalidation`].

pub mod invalidation;

pub use invalidation::{invalidated_by, Mutation, Resource};

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::errors::PortalError;
use crate::models::Language;

/// How long idle entries are kept after their last fetch.
const DEFAULT_GC_TIME: Duration = Duration::from_secs(5 * 60);

/// Identity of one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    /// Canonical JSON of the filter object (keys sorted)
    pub filters: String,
    pub language: Language,
    pub authenticated: bool,
}

impl QueryKey {
    pub fn new<F: Serialize>(
        resource: Resource,
        filters: &F,
        language: Language,
        authenticated: bool,
    ) -> Result<Self, PortalError> {
        // Going through Value sorts object keys, so equal filters give equal keys.
        let filters = serde_json::to_value(filters)?.to_string();
        Ok(Self {
            resource,
            filters,
            language,
            authenticated,
        })
    }
}

struct Entry {
    value: Option<Arc<dyn Any + Send + Sync>>,
    fetched_at: Option<Instant>,
    /// Invalidation epoch of the resource when the value was requested
    epoch: u64,
    /// Serializes fetches for this key
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl Entry {
    fn empty() -> Self {
        Self {
            value: None,
            fetched_at: None,
            epoch: 0,
            gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    epochs: HashMap<Resource, u64>,
    /// Bumped by every `clear()` and never reset
    generation: u64,
}

impl Inner {
    fn epoch(&self, resource: Resource) -> u64 {
        self.epochs.get(&resource).copied().unwrap_or(0)
    }

    /// Drop idle entries whose data is older than `gc_time`.
    ///
    /// Entries with a fetch in flight or queued keep their gate alive and stay.
    fn prune(&mut self, gc_time: Duration) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            if Arc::strong_count(&entry.gate) > 1 {
                return true;
            }
            match entry.fetched_at {
                Some(fetched_at) => fetched_at.elapsed() < gc_time,
                None => false,
            }
        });
        let pruned = before - self.entries.len();
        if pruned > 0 {
            tracing::debug!("Pruned {} idle cache entries", pruned);
        }
    }

    fn is_fresh(&self, key: &QueryKey, stale_time: Duration) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return false;
        };
        match (&entry.value, entry.fetched_at) {
            (Some(_), Some(fetched_at)) => {
                entry.epoch == self.epoch(key.resource) && fetched_at.elapsed() < stale_time
            }
            _ => false,
        }
    }
}

/// Shared cache for every hook of one [`Portal`](crate::portal::Portal).
pub struct QueryCache {
    inner: Mutex<Inner>,
    stale_time: Duration,
    gc_time: Duration,
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self::with_gc_time(stale_time, DEFAULT_GC_TIME)
    }

    /// Cache whose idle entries are dropped once older than `gc_time`
    /// (never sooner than `stale_time`).
    pub fn with_gc_time(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            stale_time,
            gc_time: gc_time.max(stale_time),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return fresh cached data for `key`, or run `fetcher` and cache its result.
    ///
    /// Errors are returned to the caller and never cached.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, PortalError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, PortalError>>,
    {
        let gate = self
            .lock()
            .entries
            .entry(key.clone())
            .or_insert_with(Entry::empty)
            .gate
            .clone();
        let _permit = gate.lock().await;

        let (generation, epoch) = {
            let inner = self.lock();
            if inner.is_fresh(&key, self.stale_time) {
                let cached = inner
                    .entries
                    .get(&key)
                    .and_then(|entry| entry.value.as_ref())
                    .and_then(|value| value.downcast_ref::<T>())
                    .cloned();
                if let Some(value) = cached {
                    tracing::debug!("Cache hit for {} {}", key.resource.as_str(), key.filters);
                    return Ok(value);
                }
            }
            (inner.generation, inner.epoch(key.resource))
        };

        tracing::debug!("Cache miss for {} {}", key.resource.as_str(), key.filters);
        let value = fetcher().await?;

        let stored: Arc<dyn Any + Send + Sync> = Arc::new(value.clone());
        let mut inner = self.lock();
        if inner.generation != generation {
            // Cleared mid-flight; the result belongs to the previous session.
            tracing::debug!("Discarding {} fetched before clear", key.resource.as_str());
            return Ok(value);
        }
        inner.prune(self.gc_time);
        let entry = inner.entries.entry(key).or_insert_with(Entry::empty);
        entry.value = Some(stored);
        entry.fetched_at = Some(Instant::now());
        entry.epoch = epoch;

        Ok(value)
    }

    /// Last cached value for `key`, fresh or not.
    pub fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.lock()
            .entries
            .get(key)
            .and_then(|entry| entry.value.as_ref())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Whether the next read of `key` goes to the network.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        !self.lock().is_fresh(key, self.stale_time)
    }

    /// Mark every cached query of `resource` stale.
    pub fn invalidate(&self, resource: Resource) {
        let mut inner = self.lock();
        *inner.epochs.entry(resource).or_insert(0) += 1;
        tracing::debug!("Invalidated {}", resource.as_str());
    }

    /// Apply the invalidation table for a successful mutation.
    pub fn invalidate_after(&self, mutation: Mutation) {
        for resource in invalidated_by(mutation) {
            self.invalidate(*resource);
        }
    }

    /// Drop everything, e.g. when the signed-in user changes.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.generation += 1;
    }
}
