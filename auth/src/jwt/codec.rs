use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::ISSUER;
use super::errors::AccessTokenError;
use crate::identity::UserId;

/// Issues and validates access tokens.
///
/// Tokens are HS256 JWTs keyed by the raw secret bytes handed to [`new`].
/// Validation never consults a store: rotating the secret is the only way to
/// invalidate tokens before they expire, and it invalidates all of them.
///
/// [`new`]: AccessTokenCodec::new
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessTokenCodec {
    /// Create a codec from raw key material.
    ///
    /// # Arguments
    /// * `secret` - Symmetric key bytes, used as-is (no hashing or decoding)
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked after decoding so that it can be reported
        // separately from signature failures, with no leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[ISSUER]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    ///
    /// # Errors
    /// * `SigningFailure` - The signer rejected the input
    pub fn issue(&self, subject: UserId, ttl: Duration) -> Result<String, AccessTokenError> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    /// Issue a token with an explicit issue instant.
    ///
    /// Output is deterministic for identical arguments and key.
    pub fn issue_at(
        &self,
        subject: UserId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, AccessTokenError> {
        let claims = Claims::for_user(subject, issued_at, ttl)?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AccessTokenError::SigningFailure(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// # Errors
    /// * `InvalidSignature` - MAC does not verify under this codec's key
    /// * `Expired` - Current time is at or after `exp`
    /// * `MalformedToken` - Structure, claims or subject cannot be parsed
    pub fn validate(&self, token: &str) -> Result<UserId, AccessTokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token against an explicit current instant.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AccessTokenError> {
        let claims = self.decode(token)?;

        if claims.is_expired(now.timestamp()) {
            return Err(AccessTokenError::Expired);
        }

        UserId::from_string(&claims.sub)
            .map_err(|e| AccessTokenError::MalformedToken(format!("Invalid subject: {}", e)))
    }

    /// Verify signature and issuer and return the claims, without checking
    /// expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, AccessTokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AccessTokenError::InvalidSignature
                }
                _ => AccessTokenError::MalformedToken(e.to_string()),
            })
    }
}
