use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::RefreshTokenError;
use super::models::RefreshTokenRecord;
use super::models::RefreshTokenStatus;
use crate::identity::UserId;
use crate::store::RefreshTokenStore;

/// Number of random bytes behind each refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a fresh token string: 32 bytes from the OS RNG, hex-encoded.
///
/// # Errors
/// * `EntropyFailure` - The random source could not supply bytes
pub fn generate_refresh_token() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RefreshTokenError::EntropyFailure(e.to_string()))?;

    Ok(hex::encode(bytes))
}

/// Issues opaque refresh tokens and governs their lifecycle.
///
/// Holds no state of its own; everything lives in the injected store.
pub struct RefreshTokenManager<S>
where
    S: RefreshTokenStore,
{
    store: Arc<S>,
    ttl: Duration,
}

impl<S> RefreshTokenManager<S>
where
    S: RefreshTokenStore,
{
    /// Create a manager with injected storage.
    ///
    /// # Arguments
    /// * `store` - Refresh token persistence implementation
    /// * `ttl` - Lifetime of newly issued tokens
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Generate a token for `user_id` and persist it.
    ///
    /// # Errors
    /// * `EntropyFailure` - The random source could not supply bytes
    /// * `LifetimeOutOfRange` - Expiry cannot be represented
    /// * `Store` - Persisting the record failed
    pub async fn issue(&self, user_id: UserId) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let token = generate_refresh_token()?;
        let record = RefreshTokenRecord::new(token, user_id, Utc::now(), self.ttl)?;

        self.store.store_refresh_token(record.clone()).await?;

        tracing::debug!(
            user_id = %user_id,
            expires_at = %record.expires_at,
            "Refresh token issued"
        );

        Ok(record)
    }

    /// Return the owner of a token that is neither revoked nor expired.
    ///
    /// # Errors
    /// * `NotFound` - No record for this token
    /// * `Revoked` - Token was revoked
    /// * `Expired` - Current time is at or after the stored expiry
    /// * `Store` - Lookup failed
    pub async fn check_valid(&self, token: &str) -> Result<UserId, RefreshTokenError> {
        self.check_valid_at(token, Utc::now()).await
    }

    /// Same as [`check_valid`](Self::check_valid) against an explicit instant.
    pub async fn check_valid_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserId, RefreshTokenError> {
        let record = self
            .store
            .lookup_refresh_token(token)
            .await?
            .ok_or(RefreshTokenError::NotFound)?;

        match record.status_at(now) {
            RefreshTokenStatus::Active => Ok(record.user_id),
            RefreshTokenStatus::Revoked => Err(RefreshTokenError::Revoked),
            RefreshTokenStatus::Expired => Err(RefreshTokenError::Expired),
        }
    }

    /// Revoke a token. Revoking twice is an error.
    ///
    /// # Errors
    /// * `NotFound` - No record for this token
    /// * `AlreadyRevoked` - Token was already revoked, possibly concurrently
    /// * `Store` - Lookup or update failed
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        let record = self
            .store
            .lookup_refresh_token(token)
            .await?
            .ok_or(RefreshTokenError::NotFound)?;

        if record.is_revoked() {
            return Err(RefreshTokenError::AlreadyRevoked);
        }

        if !self.store.mark_revoked(token, Utc::now()).await? {
            return Err(RefreshTokenError::AlreadyRevoked);
        }

        tracing::debug!(user_id = %record.user_id, "Refresh token revoked");

        Ok(())
    }
}
