use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use super::errors::StoreError;
use super::ports::CredentialStore;
use super::ports::RefreshTokenStore;
use crate::identity::EmailAddress;
use crate::identity::UserCredentials;
use crate::identity::UserId;
use crate::refresh::models::RefreshTokenRecord;

/// Process-local refresh token table.
///
/// Every operation takes the lock once, so a committed revocation is visible
/// to all later lookups.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn store_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().await;
        match tokens.entry(record.token.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateToken),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn lookup_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn mark_revoked(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(token) {
            Some(record) if record.revoked_at.is_none() => {
                record.revoked_at = Some(revoked_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Process-local credential table keyed by email.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<EmailAddress, UserCredentials>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the credentials registered under an email.
    pub async fn insert(&self, credentials: UserCredentials) {
        self.users
            .write()
            .await
            .insert(credentials.email.clone(), credentials);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn find_credentials_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserCredentials>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|credentials| credentials.user_id == *user_id)
            .cloned())
    }
}
