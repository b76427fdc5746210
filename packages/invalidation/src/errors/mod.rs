use crate::InvalidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    CacheStoreFailure,
    InvalidConfig,
    MissingTenant,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CacheStoreFailure => "DDL_INVALIDATION_ERROR_CACHE_STORE_FAILURE",
            Self::InvalidConfig => "DDL_INVALIDATION_ERROR_INVALID_CONFIG",
            Self::MissingTenant => "DDL_INVALIDATION_ERROR_MISSING_TENANT",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[Self::CacheStoreFailure, Self::InvalidConfig, Self::MissingTenant]
    }
}

fn build_error(code: ErrorCode, title: &str, description: &str) -> InvalidationError {
    InvalidationError::new(code.as_str(), title, description)
}

/// Error a [`crate::CacheStore`] implementation returns when it could not drop a key range.
pub fn cache_store_error(description: impl AsRef<str>) -> InvalidationError {
    build_error(
        ErrorCode::CacheStoreFailure,
        "Cache invalidation failed",
        description.as_ref(),
    )
}

pub(crate) fn invalid_config_error(description: &str) -> InvalidationError {
    build_error(
        ErrorCode::InvalidConfig,
        "Invalid invalidation config",
        description,
    )
}

pub(crate) fn missing_tenant_error() -> InvalidationError {
    build_error(
        ErrorCode::MissingTenant,
        "Tenant id missing",
        "Invalidation events must carry a non-empty tenant id. No cache scopes were invalidated.",
    )
}
