use thiserror::Error;

use crate::errors::ErrorClass;
use crate::store::StoreError;

/// Error type for refresh token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Refresh token not found")]
    NotFound,

    #[error("Refresh token has been revoked")]
    Revoked,

    #[error("Refresh token is expired")]
    Expired,

    #[error("Refresh token was already revoked")]
    AlreadyRevoked,

    #[error("Refresh token lifetime is out of range: {0}")]
    LifetimeOutOfRange(String),

    #[error("Entropy source failed: {0}")]
    EntropyFailure(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl RefreshTokenError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RefreshTokenError::NotFound
            | RefreshTokenError::Revoked
            | RefreshTokenError::Expired
            | RefreshTokenError::AlreadyRevoked => ErrorClass::AuthenticationOutcome,
            RefreshTokenError::LifetimeOutOfRange(_) | RefreshTokenError::EntropyFailure(_) => {
                ErrorClass::Infrastructure
            }
            RefreshTokenError::Store(e) => e.class(),
        }
    }
}
