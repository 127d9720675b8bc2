use http::StatusCode;

/// Coarse classification shared by every error in this crate.
///
/// Callers map errors to responses through the class only, so a response
/// never reveals which individual check rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself is malformed (missing or badly formed header).
    ClientInput,
    /// Credentials or tokens were presented but not accepted.
    AuthenticationOutcome,
    /// Hashing, signing, entropy or storage failed. Logged, never shown.
    Infrastructure,
}

impl ErrorClass {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorClass::ClientInput => StatusCode::BAD_REQUEST,
            ErrorClass::AuthenticationOutcome => StatusCode::UNAUTHORIZED,
            ErrorClass::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(self) -> &'static str {
        match self {
            ErrorClass::ClientInput => "Malformed Authorization header",
            ErrorClass::AuthenticationOutcome => "Invalid credentials",
            ErrorClass::Infrastructure => "Internal server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorClass::ClientInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorClass::AuthenticationOutcome.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorClass::Infrastructure.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
