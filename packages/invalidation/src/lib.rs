mod classifier;
mod config;
mod dispatcher;
mod error;
mod errors;
mod keys;
mod pipeline;
mod store;
mod types;

pub use classifier::classify;
pub use config::{InvalidationConfig, DEFAULT_SCHEMA};
pub use dispatcher::{Dispatcher, InvalidationScope};
pub use error::InvalidationError;
pub use errors::{cache_store_error, ErrorCode};
pub use keys::{CacheKey, KeySegment};
pub use pipeline::InvalidationEngine;
pub use store::{CacheStore, InMemoryCacheStore, InvalidateOptions};
pub use types::{Action, EntityType, InvalidationEvent};
