use thiserror::Error;

use crate::errors::ErrorClass;

/// Error reported by a persistence adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Refresh token already exists")]
    DuplicateToken,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl StoreError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Infrastructure
    }
}
