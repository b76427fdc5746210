use serde::{Deserialize, Serialize};

/// Schema-object categories the classifier recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Table,
    View,
    MaterializedView,
    ForeignTable,
    Function,
    Procedure,
    Trigger,
    Policy,
    Index,
    Extension,
}

impl EntityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::View => "view",
            Self::MaterializedView => "materialized_view",
            Self::ForeignTable => "foreign_table",
            Self::Function => "function",
            Self::Procedure => "procedure",
            Self::Trigger => "trigger",
            Self::Policy => "policy",
            Self::Index => "index",
            Self::Extension => "extension",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Table,
            Self::View,
            Self::MaterializedView,
            Self::ForeignTable,
            Self::Function,
            Self::Procedure,
            Self::Trigger,
            Self::Policy,
            Self::Index,
            Self::Extension,
        ]
    }

    /// Entity types listed in the schema browser's entity-type summary.
    pub const fn appears_in_summary(self) -> bool {
        matches!(
            self,
            Self::Table | Self::View | Self::MaterializedView | Self::ForeignTable
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Alter,
    Drop,
    Enable,
    Disable,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Alter => "alter",
            Self::Drop => "drop",
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }
}

/// One schema mutation, as far as the cache is concerned.
///
/// Built by [`crate::classify`] and consumed once by [`crate::Dispatcher`].
/// `schema` stays `None` when the statement carried no qualifier; the
/// dispatcher substitutes the configured default schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationEvent {
    pub tenant_id: String,
    pub entity_type: EntityType,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
}

impl InvalidationEvent {
    pub fn new(tenant_id: impl Into<String>, entity_type: EntityType, action: Action) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            entity_type,
            action,
            schema: None,
            table: None,
            entity_name: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_entity_name(mut self, entity_name: impl Into<String>) -> Self {
        self.entity_name = Some(entity_name.into());
        self
    }

    pub fn schema_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.schema.as_deref().unwrap_or(default)
    }

    pub fn has_tenant(&self) -> bool {
        !self.tenant_id.trim().is_empty()
    }
}
