use thiserror::Error;

use crate::errors::ErrorClass;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    /// Derivation could not run, the entropy source failed, or a stored
    /// record could not be parsed.
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),
}

impl PasswordError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Infrastructure
    }
}
