use serde::{Deserialize, Serialize};

use crate::errors::invalid_config_error;
use crate::InvalidationError;

pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvalidationConfig {
    /// Substituted whenever a statement names an object without a schema qualifier.
    pub default_schema: String,
}

impl Default for InvalidationConfig {
    fn default() -> Self {
        Self {
            default_schema: DEFAULT_SCHEMA.to_string(),
        }
    }
}

impl InvalidationConfig {
    pub fn with_default_schema(default_schema: impl Into<String>) -> Self {
        Self {
            default_schema: default_schema.into(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, InvalidationError> {
        let config: Self = serde_json::from_str(raw).map_err(|error| {
            invalid_config_error(&format!("config is not valid JSON: {error}"))
        })?;
        config.validated()
    }

    pub fn validate(&self) -> Result<(), InvalidationError> {
        if self.default_schema.trim().is_empty() {
            return Err(invalid_config_error("`default_schema` must not be blank"));
        }
        Ok(())
    }

    pub fn validated(self) -> Result<Self, InvalidationError> {
        self.validate()?;
        Ok(self)
    }
}
