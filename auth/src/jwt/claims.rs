use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::identity::UserId;
use crate::jwt::errors::AccessTokenError;

/// Issuer label carried by every access token.
pub const ISSUER: &str = "chirpy";

/// Registered claims of an access token.
///
/// Timestamps are whole Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Subject (stringified user id)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for `ttl` from `issued_at`.
    ///
    /// # Errors
    /// * `SigningFailure` - Expiry falls outside the representable time range
    pub fn for_user(
        user_id: UserId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, AccessTokenError> {
        let expiration = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            AccessTokenError::SigningFailure(format!("Token lifetime {} is out of range", ttl))
        })?;

        Ok(Self {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// A token is expired at and after its `exp` second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
