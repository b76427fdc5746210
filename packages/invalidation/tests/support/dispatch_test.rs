#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ddl_invalidation::{
    cache_store_error, CacheKey, CacheStore, InMemoryCacheStore, InvalidateOptions,
    InvalidationConfig, InvalidationEngine, InvalidationError, InvalidationEvent,
};
use serde_json::json;
use tokio::sync::Barrier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Inline,
    Scheduled,
}

/// Cache store that records every call and can be told to fail on given keys.
///
/// With a barrier installed, each invalidate parks until the barrier fills,
/// so a round only completes if its calls are in flight together.
#[derive(Default)]
pub struct RecordingStore {
    pub cache: InMemoryCacheStore,
    calls: Mutex<Vec<(CacheKey, InvalidateOptions)>>,
    failing_keys: Mutex<Vec<CacheKey>>,
    barrier: Mutex<Option<Arc<Barrier>>>,
}

impl RecordingStore {
    pub fn calls(&self) -> Vec<(CacheKey, InvalidateOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn invalidated_keys(&self) -> Vec<CacheKey> {
        self.calls().into_iter().map(|(key, _)| key).collect()
    }

    pub fn fail_on(&self, key: CacheKey) {
        self.failing_keys.lock().unwrap().push(key);
    }

    pub fn gate_on(&self, barrier: Arc<Barrier>) {
        *self.barrier.lock().unwrap() = Some(barrier);
    }

    pub fn seed(&self, key: CacheKey) {
        self.cache.insert(key, json!({ "cached": true })).unwrap();
    }

    pub fn cached(&self, key: &CacheKey) -> bool {
        self.cache.contains(key).unwrap()
    }
}

#[async_trait]
impl CacheStore for RecordingStore {
    async fn invalidate(
        &self,
        key: &CacheKey,
        options: InvalidateOptions,
    ) -> Result<(), InvalidationError> {
        self.calls.lock().unwrap().push((key.clone(), options));
        let barrier = self.barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        if self.failing_keys.lock().unwrap().contains(key) {
            return Err(cache_store_error(format!("refusing to invalidate {key}")));
        }
        self.cache.invalidate(key, options).await
    }
}

pub struct Harness {
    pub mode: DispatchMode,
    pub store: Arc<RecordingStore>,
    pub engine: InvalidationEngine,
}

impl Harness {
    pub fn new(mode: DispatchMode) -> Self {
        Self::with_config(mode, InvalidationConfig::default())
    }

    pub fn with_config(mode: DispatchMode, config: InvalidationConfig) -> Self {
        let store = Arc::new(RecordingStore::default());
        let engine = InvalidationEngine::new(store.clone(), config).expect("valid config");
        Self {
            mode,
            store,
            engine,
        }
    }

    /// Feeds one executed statement through the engine and waits for the round to finish.
    pub async fn run(&self, sql: &str, tenant_id: &str) -> Option<InvalidationEvent> {
        match self.mode {
            DispatchMode::Inline => self.engine.invalidate_now(sql, tenant_id).await,
            DispatchMode::Scheduled => {
                let event = self.engine.classify(sql, tenant_id);
                if let Some(handle) = self.engine.on_mutation_succeeded(sql, tenant_id) {
                    handle.await.expect("invalidation task panicked");
                }
                event
            }
        }
    }

    /// Dispatches a hand-built event the same way `run` dispatches classified ones.
    pub async fn dispatch(&self, event: InvalidationEvent) {
        match self.mode {
            DispatchMode::Inline => self.engine.dispatcher().dispatch(&event).await,
            DispatchMode::Scheduled => {
                if let Some(handle) = self.engine.dispatcher().schedule(event) {
                    handle.await.expect("invalidation task panicked");
                }
            }
        }
    }
}
