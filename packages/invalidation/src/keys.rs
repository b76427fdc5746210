//! Hierarchical cache-key namespace shared with the client-side query cache.
//!
//! Every key starts with the tenant id, followed by a collection segment
//! (`"tables"`, `"policies"`, ...) and then narrowing segments. A key used
//! as a prefix covers every key nested under it.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySegment {
    Text(String),
    Flag(bool),
}

impl From<&str> for KeySegment {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for KeySegment {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for KeySegment {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(Vec<KeySegment>);

impl CacheKey {
    pub fn new(segments: Vec<KeySegment>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &CacheKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn child(&self, segment: impl Into<KeySegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (position, segment) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(",")?;
            }
            match segment {
                KeySegment::Text(text) => write!(f, "{text:?}")?,
                KeySegment::Flag(flag) => write!(f, "{flag}")?,
            }
        }
        f.write_str("]")
    }
}

const TABLES: &str = "tables";
const TABLE: &str = "table";
const TRIGGERS: &str = "triggers";
const INDEXES: &str = "indexes";
const VIEWS: &str = "views";
const MATERIALIZED_VIEWS: &str = "materialized-views";
const FOREIGN_TABLES: &str = "foreign-tables";
const POLICIES: &str = "policies";
const FUNCTIONS: &str = "functions";
const EXTENSIONS: &str = "extensions";
const ENTITY_TYPES: &str = "entity-types";

fn tenant_collection(tenant_id: &str, collection: &str) -> CacheKey {
    CacheKey(vec![tenant_id.into(), collection.into()])
}

pub(crate) fn table_list(tenant_id: &str, schema: &str, include_columns: bool) -> CacheKey {
    tenant_collection(tenant_id, TABLES)
        .child(schema)
        .child(include_columns)
}

pub(crate) fn table_detail(tenant_id: &str, schema: &str, table: &str) -> CacheKey {
    tenant_collection(tenant_id, TABLE).child(schema).child(table)
}

pub(crate) fn table_triggers(tenant_id: &str, schema: &str, table: &str) -> CacheKey {
    table_detail(tenant_id, schema, table).child(TRIGGERS)
}

pub(crate) fn table_indexes(tenant_id: &str, schema: &str, table: &str) -> CacheKey {
    table_detail(tenant_id, schema, table).child(INDEXES)
}

pub(crate) fn view_list(tenant_id: &str, schema: Option<&str>) -> CacheKey {
    optionally_schema_scoped(tenant_collection(tenant_id, VIEWS), schema)
}

pub(crate) fn materialized_view_list(tenant_id: &str, schema: Option<&str>) -> CacheKey {
    optionally_schema_scoped(tenant_collection(tenant_id, MATERIALIZED_VIEWS), schema)
}

pub(crate) fn foreign_table_list(tenant_id: &str, schema: Option<&str>) -> CacheKey {
    optionally_schema_scoped(tenant_collection(tenant_id, FOREIGN_TABLES), schema)
}

pub(crate) fn policy_list(tenant_id: &str, schema: &str) -> CacheKey {
    tenant_collection(tenant_id, POLICIES).child(schema)
}

pub(crate) fn function_list(tenant_id: &str) -> CacheKey {
    tenant_collection(tenant_id, FUNCTIONS)
}

pub(crate) fn trigger_list(tenant_id: &str) -> CacheKey {
    tenant_collection(tenant_id, TRIGGERS)
}

pub(crate) fn index_list(tenant_id: &str, schema: &str) -> CacheKey {
    tenant_collection(tenant_id, INDEXES).child(schema)
}

pub(crate) fn extension_list(tenant_id: &str) -> CacheKey {
    tenant_collection(tenant_id, EXTENSIONS)
}

pub(crate) fn entity_type_summary(tenant_id: &str) -> CacheKey {
    tenant_collection(tenant_id, ENTITY_TYPES)
}

fn optionally_schema_scoped(key: CacheKey, schema: Option<&str>) -> CacheKey {
    match schema {
        Some(schema) => key.child(schema),
        None => key,
    }
}
