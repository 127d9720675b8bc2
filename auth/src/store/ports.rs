use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use super::errors::StoreError;
use crate::identity::EmailAddress;
use crate::identity::UserCredentials;
use crate::identity::UserId;
use crate::refresh::models::RefreshTokenRecord;

/// Persistence operations for refresh tokens.
///
/// Implementations must be consistent per row: once `mark_revoked` commits,
/// every later `lookup_refresh_token` observes it.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a newly issued token.
    ///
    /// # Errors
    /// * `DuplicateToken` - A record with this token already exists
    /// * `DatabaseError` - Database operation failed
    async fn store_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), StoreError>;

    /// Retrieve a token record regardless of its revocation or expiry state.
    ///
    /// # Returns
    /// Optional record (None if never stored)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn lookup_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Set `revoked_at` if it is still unset.
    ///
    /// # Returns
    /// True if this call performed the transition, false if the token is
    /// unknown or was already revoked
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn mark_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

/// Read access to stored password records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve login material by email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, StoreError>;

    /// Retrieve login material by user id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_credentials_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserCredentials>, StoreError>;
}
