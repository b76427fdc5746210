mod strategy;

use futures_util::future::join_all;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::errors::missing_tenant_error;
use crate::{CacheStore, InvalidationConfig, InvalidationError, InvalidationEvent};

pub use strategy::InvalidationScope;

/// Maps [`InvalidationEvent`]s to cache scopes and drops them from the store.
///
/// Holds no state between calls, so one dispatcher can serve any number of
/// concurrent mutations. Invalidation is idempotent; rounds for racing
/// mutations may overlap freely.
pub struct Dispatcher {
    store: Arc<dyn CacheStore>,
    config: InvalidationConfig,
}

impl Dispatcher {
    /// Fails with `INVALID_CONFIG` when `config` does not validate.
    pub fn new(
        store: Arc<dyn CacheStore>,
        config: InvalidationConfig,
    ) -> Result<Self, InvalidationError> {
        Ok(Self {
            store,
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &InvalidationConfig {
        &self.config
    }

    /// Scopes `dispatch` would invalidate for `event`, without touching the store.
    pub fn plan(&self, event: &InvalidationEvent) -> Vec<InvalidationScope> {
        strategy::plan_scopes(event, &self.config.default_schema)
    }

    /// Invalidates every planned scope concurrently.
    ///
    /// Never fails: the mutation already committed, so store errors are
    /// logged per scope and otherwise ignored. No retries.
    pub async fn dispatch(&self, event: &InvalidationEvent) {
        if !event.has_tenant() {
            let error = missing_tenant_error();
            warn!(
                code = %error.code,
                entity_type = event.entity_type.as_str(),
                action = event.action.as_str(),
                "{}",
                error.description
            );
            return;
        }

        let scopes = self.plan(event);
        let results = join_all(scopes.iter().map(|scope| async move {
            trace!(key = %scope.key, exact = scope.options.exact, "invalidating cache scope");
            (scope, self.store.invalidate(&scope.key, scope.options).await)
        }))
        .await;

        let mut failed = 0usize;
        for (scope, result) in results {
            if let Err(error) = result {
                failed += 1;
                warn!(
                    tenant_id = %event.tenant_id,
                    key = %scope.key,
                    code = %error.code,
                    error = %error.description,
                    "cache scope invalidation failed"
                );
            }
        }

        debug!(
            tenant_id = %event.tenant_id,
            entity_type = event.entity_type.as_str(),
            action = event.action.as_str(),
            issued = scopes.len(),
            failed,
            "invalidation round finished"
        );
    }

    /// Runs [`Dispatcher::dispatch`] on a spawned task after the caller yields.
    ///
    /// The handle may be dropped. Returns `None` (and logs) when called
    /// outside a tokio runtime.
    pub fn schedule(self: &Arc<Self>, event: InvalidationEvent) -> Option<JoinHandle<()>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(error) => {
                warn!(
                    tenant_id = %event.tenant_id,
                    entity_type = event.entity_type.as_str(),
                    error = %error,
                    "no async runtime available; invalidation skipped"
                );
                return None;
            }
        };
        let dispatcher = Arc::clone(self);
        Some(handle.spawn(async move {
            tokio::task::yield_now().await;
            dispatcher.dispatch(&event).await;
        }))
    }
}
