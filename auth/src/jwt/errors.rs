use thiserror::Error;

use crate::errors::ErrorClass;

/// Error type for access token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessTokenError {
    #[error("Failed to sign token: {0}")]
    SigningFailure(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is malformed: {0}")]
    MalformedToken(String),
}

impl AccessTokenError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AccessTokenError::SigningFailure(_) => ErrorClass::Infrastructure,
            AccessTokenError::InvalidSignature
            | AccessTokenError::Expired
            | AccessTokenError::MalformedToken(_) => ErrorClass::AuthenticationOutcome,
        }
    }
}
