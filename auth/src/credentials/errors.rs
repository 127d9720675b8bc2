use thiserror::Error;

use super::header::Scheme;
use crate::errors::ErrorClass;

/// Error type for `Authorization` header parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must start with '{}'", .expected.prefix())]
    MalformedHeader { expected: Scheme },
}

impl CredentialError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::ClientInput
    }
}
