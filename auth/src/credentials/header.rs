use std::fmt;

use http::header::AUTHORIZATION;
use http::HeaderMap;

use super::errors::CredentialError;

/// Authorization scheme accepted by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    ApiKey,
    Bearer,
}

impl Scheme {
    /// Literal header prefix, case-sensitive, including the single space.
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::ApiKey => "ApiKey ",
            Scheme::Bearer => "Bearer ",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end())
    }
}

/// Value carried by an `Authorization` header, tagged with its scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub scheme: Scheme,
    pub value: String,
}

impl Credential {
    /// Parse a raw header value for the expected scheme.
    ///
    /// # Errors
    /// * `MissingHeader` - No header value was supplied
    /// * `MalformedHeader` - Prefix does not match or the credential is empty
    pub fn parse(header: Option<&str>, scheme: Scheme) -> Result<Self, CredentialError> {
        let header = header.ok_or(CredentialError::MissingHeader)?;

        let value = header
            .strip_prefix(scheme.prefix())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(CredentialError::MalformedHeader { expected: scheme })?;

        Ok(Self {
            scheme,
            value: value.to_string(),
        })
    }

    /// Read the `Authorization` header out of a request's headers.
    ///
    /// A header value that is not visible ASCII is reported as malformed.
    pub fn from_headers(headers: &HeaderMap, scheme: Scheme) -> Result<Self, CredentialError> {
        let header = headers
            .get(AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| CredentialError::MalformedHeader { expected: scheme })
            })
            .transpose()?;

        Self::parse(header, scheme)
    }
}

/// Extract the key from `Authorization: ApiKey <key>`.
pub fn extract_api_key(header: Option<&str>) -> Result<String, CredentialError> {
    Credential::parse(header, Scheme::ApiKey).map(|credential| credential.value)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Serves both access and refresh tokens; the endpoint decides which kind it
/// expects.
pub fn extract_bearer_token(header: Option<&str>) -> Result<String, CredentialError> {
    Credential::parse(header, Scheme::Bearer).map(|credential| credential.value)
}
