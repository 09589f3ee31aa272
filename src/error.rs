//! Caller-facing error taxonomy.

use thiserror::Error;

use crate::{auth::AuthError, persist::StoreError, types::ProductId};

/// Outcome of a failed single-item operation.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Referenced product id does not exist.
    #[error("product {0} not found")]
    NotFound(ProductId),
    /// Product name is already taken.
    #[error("product name already exists: {0}")]
    Conflict(String),
    /// Input could not be coerced or a required field is missing.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No credential was presented for a protected operation.
    #[error("access denied: no credential presented")]
    Forbidden,
    /// Credential was presented but failed verification.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Storage collaborator failed or the runtime is gone.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<StoreError> for InventoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NameConflict(name) => Self::Conflict(name),
            StoreError::MissingProduct(id) => Self::NotFound(id),
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<AuthError> for InventoryError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::Forbidden => Self::Forbidden,
            AuthError::Unauthorized(reason) => Self::Unauthorized(reason),
        }
    }
}

/// Result alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;
