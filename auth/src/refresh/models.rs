use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::identity::UserId;
use crate::refresh::errors::RefreshTokenError;

/// Stored state of one refresh token.
///
/// Only `revoked_at` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    /// 64 lowercase hex characters
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a refresh token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenStatus {
    Active,
    Revoked,
    Expired,
}

impl RefreshTokenRecord {
    /// Create an active record expiring `ttl` after `created_at`.
    ///
    /// # Errors
    /// * `LifetimeOutOfRange` - Expiry falls outside the representable time range
    pub fn new(
        token: String,
        user_id: UserId,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, RefreshTokenError> {
        let expires_at = created_at
            .checked_add_signed(ttl)
            .ok_or_else(|| RefreshTokenError::LifetimeOutOfRange(ttl.to_string()))?;

        Ok(Self {
            token,
            user_id,
            created_at,
            expires_at,
            revoked_at: None,
        })
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Revocation takes precedence over expiry.
    pub fn status_at(&self, now: DateTime<Utc>) -> RefreshTokenStatus {
        if self.is_revoked() {
            RefreshTokenStatus::Revoked
        } else if self.is_expired_at(now) {
            RefreshTokenStatus::Expired
        } else {
            RefreshTokenStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ttl: Duration) -> RefreshTokenRecord {
        RefreshTokenRecord::new("ab".repeat(32), UserId::new(), Utc::now(), ttl).unwrap()
    }

    #[test]
    fn test_status_transitions() {
        let mut token = record(Duration::days(60));
        let now = token.created_at;

        assert_eq!(token.status_at(now), RefreshTokenStatus::Active);
        assert_eq!(
            token.status_at(token.expires_at),
            RefreshTokenStatus::Expired
        );

        token.revoked_at = Some(now);
        assert_eq!(token.status_at(now), RefreshTokenStatus::Revoked);
        assert_eq!(
            token.status_at(token.expires_at),
            RefreshTokenStatus::Revoked
        );
    }

    #[test]
    fn test_expiry_is_fixed_from_creation() {
        let token = record(Duration::days(60));
        assert_eq!(token.expires_at - token.created_at, Duration::days(60));
    }

    #[test]
    fn test_overflowing_lifetime_is_an_error() {
        let result = RefreshTokenRecord::new(
            "ab".repeat(32),
            UserId::new(),
            Utc::now(),
            Duration::days(1_000_000_000),
        );
        assert!(matches!(
            result,
            Err(RefreshTokenError::LifetimeOutOfRange(_))
        ));
    }
}
