use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::{
    classify, CacheStore, Dispatcher, InvalidationConfig, InvalidationError, InvalidationEvent,
};

/// Entry point for the SQL execution path.
///
/// Call it once per successfully executed statement. Failed statements
/// must never reach it; [`InvalidationEngine::after_execute`] enforces that
/// for callers holding a `Result`.
pub struct InvalidationEngine {
    dispatcher: Arc<Dispatcher>,
}

impl InvalidationEngine {
    pub fn new(
        store: Arc<dyn CacheStore>,
        config: InvalidationConfig,
    ) -> Result<Self, InvalidationError> {
        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(store, config)?),
        })
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn classify(&self, sql: &str, tenant_id: &str) -> Option<InvalidationEvent> {
        classify(sql, tenant_id)
    }

    /// Classifies `sql` and schedules the invalidation round without waiting for it.
    pub fn on_mutation_succeeded(&self, sql: &str, tenant_id: &str) -> Option<JoinHandle<()>> {
        let event = classify(sql, tenant_id)?;
        self.dispatcher.schedule(event)
    }

    /// Classifies `sql` and runs the invalidation round inline.
    ///
    /// Returns the dispatched event, if any.
    pub async fn invalidate_now(&self, sql: &str, tenant_id: &str) -> Option<InvalidationEvent> {
        let event = classify(sql, tenant_id)?;
        self.dispatcher.dispatch(&event).await;
        Some(event)
    }

    pub fn after_execute<T, E>(
        &self,
        result: &Result<T, E>,
        sql: &str,
        tenant_id: &str,
    ) -> Option<JoinHandle<()>> {
        if result.is_err() {
            return None;
        }
        self.on_mutation_succeeded(sql, tenant_id)
    }
}
