use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::errors::cache_store_error;
use crate::{CacheKey, InvalidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidateOptions {
    /// `true` drops only the literal key; `false` drops every key nested under it.
    pub exact: bool,
}

impl InvalidateOptions {
    pub const fn exact() -> Self {
        Self { exact: true }
    }

    pub const fn prefix() -> Self {
        Self { exact: false }
    }

    pub fn matches(&self, scope: &CacheKey, candidate: &CacheKey) -> bool {
        if self.exact {
            candidate == scope
        } else {
            candidate.starts_with(scope)
        }
    }
}

/// Reactive query cache the dispatcher invalidates. Owned outside this crate.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn invalidate(
        &self,
        key: &CacheKey,
        options: InvalidateOptions,
    ) -> Result<(), InvalidationError>;
}

/// Process-local cache store keyed by [`CacheKey`].
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<BTreeMap<CacheKey, JsonValue>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: CacheKey, value: JsonValue) -> Result<(), InvalidationError> {
        self.lock()?.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &CacheKey) -> Result<Option<JsonValue>, InvalidationError> {
        Ok(self.lock()?.get(key).cloned())
    }

    pub fn contains(&self, key: &CacheKey) -> Result<bool, InvalidationError> {
        Ok(self.lock()?.contains_key(key))
    }

    pub fn keys(&self) -> Result<Vec<CacheKey>, InvalidationError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, InvalidationError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, InvalidationError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<CacheKey, JsonValue>>, InvalidationError> {
        self.entries
            .lock()
            .map_err(|_| cache_store_error("in-memory cache store lock poisoned"))
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn invalidate(
        &self,
        key: &CacheKey,
        options: InvalidateOptions,
    ) -> Result<(), InvalidationError> {
        let mut entries = self.lock()?;
        if options.exact {
            entries.remove(key);
        } else {
            entries.retain(|candidate, _| !options.matches(key, candidate));
        }
        Ok(())
    }
}
