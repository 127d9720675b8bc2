use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use http::HeaderMap;
use http::StatusCode;

use crate::config::AuthConfig;
use crate::credentials::extract_bearer_token;
use crate::credentials::Credential;
use crate::credentials::CredentialError;
use crate::credentials::Scheme;
use crate::errors::ErrorClass;
use crate::identity::EmailAddress;
use crate::identity::UserId;
use crate::jwt::AccessTokenCodec;
use crate::jwt::AccessTokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::RefreshTokenError;
use crate::refresh::RefreshTokenManager;
use crate::store::CredentialStore;
use crate::store::RefreshTokenStore;
use crate::store::StoreError;

/// Authentication coordinator.
///
/// Ties password verification, access token minting and refresh token
/// lifecycle together behind the four operations an HTTP layer needs:
/// login, authenticate, refresh and revoke.
pub struct Authenticator<C, R>
where
    C: CredentialStore,
    R: RefreshTokenStore,
{
    password_hasher: PasswordHasher,
    access_tokens: AccessTokenCodec,
    refresh_tokens: RefreshTokenManager<R>,
    credentials: Arc<C>,
    access_token_ttl: Duration,
    decoy_record: String,
}

/// Tokens handed out by a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    /// Signed access token
    pub access_token: String,
    /// Opaque refresh token
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    /// Unknown email, malformed email or wrong password. Never distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Access token error: {0}")]
    AccessToken(#[from] AccessTokenError),

    #[error("Refresh token error: {0}")]
    RefreshToken(#[from] RefreshTokenError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl AuthenticationError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AuthenticationError::InvalidCredentials => ErrorClass::AuthenticationOutcome,
            AuthenticationError::InvalidConfig(_) => ErrorClass::Infrastructure,
            AuthenticationError::Credential(e) => e.class(),
            AuthenticationError::Password(e) => e.class(),
            AuthenticationError::AccessToken(e) => e.class(),
            AuthenticationError::RefreshToken(e) => e.class(),
            AuthenticationError::Store(e) => e.class(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.class().status_code()
    }

    /// Caller-facing message; depends only on the error class.
    pub fn public_message(&self) -> &'static str {
        self.class().public_message()
    }
}

impl<C, R> Authenticator<C, R>
where
    C: CredentialStore,
    R: RefreshTokenStore,
{
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Raw key bytes for access token signing
    /// * `config` - Token lifetimes and hashing profile
    /// * `credentials` - Password record lookup
    /// * `refresh_store` - Refresh token persistence
    ///
    /// # Errors
    /// * `InvalidConfig` - A token lifetime is not positive or out of range
    /// * `Password` - Hashing profile is invalid
    pub fn new(
        jwt_secret: &[u8],
        config: &AuthConfig,
        credentials: Arc<C>,
        refresh_store: Arc<R>,
    ) -> Result<Self, AuthenticationError> {
        let access_token_ttl = config
            .access_token_ttl()
            .map_err(|e| AuthenticationError::InvalidConfig(e.to_string()))?;
        let refresh_token_ttl = config
            .refresh_token_ttl()
            .map_err(|e| AuthenticationError::InvalidConfig(e.to_string()))?;

        let password_hasher = PasswordHasher::with_config(config.password_hashing)?;
        let decoy_record = password_hasher.decoy_record()?;

        Ok(Self {
            password_hasher,
            access_tokens: AccessTokenCodec::new(jwt_secret),
            refresh_tokens: RefreshTokenManager::new(refresh_store, refresh_token_ttl),
            credentials,
            access_token_ttl,
            decoy_record,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and open a session.
    ///
    /// # Returns
    /// Session with a fresh access token and a persisted refresh token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Password` - Stored record is unusable
    /// * `AccessToken` / `RefreshToken` / `Store` - Token minting failed
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthenticationError> {
        self.open_session(email, password)
            .await
            .inspect_err(|e| log_rejection("login", e))
    }

    async fn open_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthenticationError> {
        let email = EmailAddress::new(email.to_string())
            .map_err(|_| AuthenticationError::InvalidCredentials)?;

        let credentials = self.credentials.find_credentials_by_email(&email).await?;

        // Unknown accounts are checked against the decoy so both failure
        // paths pay for one Argon2 run.
        let stored_hash = match &credentials {
            Some(credentials) => credentials.password_hash.clone(),
            None => self.decoy_record.clone(),
        };

        // Argon2 is CPU and memory bound; keep it off the async workers.
        let hasher = self.password_hasher.clone();
        let password = password.to_string();
        let is_valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| PasswordError::HashingFailure(e.to_string()))??;

        let credentials = match credentials {
            Some(credentials) if is_valid => credentials,
            _ => return Err(AuthenticationError::InvalidCredentials),
        };

        let access_token = self
            .access_tokens
            .issue(credentials.user_id, self.access_token_ttl)?;
        let refresh = self.refresh_tokens.issue(credentials.user_id).await?;

        tracing::info!(user_id = %credentials.user_id, "User logged in");

        Ok(Session {
            user_id: credentials.user_id,
            access_token,
            refresh_token: refresh.token,
            refresh_token_expires_at: refresh.expires_at,
        })
    }

    /// Resolve the caller of an authenticated request.
    ///
    /// # Arguments
    /// * `authorization` - Raw `Authorization` header value, if any
    ///
    /// # Errors
    /// * `Credential` - Header missing or not a bearer credential
    /// * `AccessToken` - Token invalid or expired
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<UserId, AuthenticationError> {
        extract_bearer_token(authorization)
            .map_err(AuthenticationError::from)
            .and_then(|token| self.access_tokens.validate(&token).map_err(Into::into))
            .inspect_err(|e| log_rejection("authenticate", e))
    }

    /// [`authenticate`](Self::authenticate) reading from request headers.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<UserId, AuthenticationError> {
        Credential::from_headers(headers, Scheme::Bearer)
            .map_err(AuthenticationError::from)
            .and_then(|credential| {
                self.access_tokens
                    .validate(&credential.value)
                    .map_err(Into::into)
            })
            .inspect_err(|e| log_rejection("authenticate", e))
    }

    /// Exchange a refresh token (carried as a bearer credential) for a new
    /// access token.
    ///
    /// # Errors
    /// * `Credential` - Header missing or not a bearer credential
    /// * `RefreshToken` - Token unknown, revoked or expired
    /// * `InvalidCredentials` - Owner no longer exists
    pub async fn refresh(&self, authorization: Option<&str>) -> Result<String, AuthenticationError> {
        self.mint_from_refresh_token(authorization)
            .await
            .inspect_err(|e| log_rejection("refresh", e))
    }

    async fn mint_from_refresh_token(
        &self,
        authorization: Option<&str>,
    ) -> Result<String, AuthenticationError> {
        let token = extract_bearer_token(authorization)?;
        let user_id = self.refresh_tokens.check_valid(&token).await?;

        // Only sign subjects that still exist.
        self.credentials
            .find_credentials_by_id(&user_id)
            .await?
            .ok_or(AuthenticationError::InvalidCredentials)?;

        Ok(self.access_tokens.issue(user_id, self.access_token_ttl)?)
    }

    /// Revoke the refresh token carried as a bearer credential.
    ///
    /// Access tokens already minted from it stay valid until they expire.
    ///
    /// # Errors
    /// * `Credential` - Header missing or not a bearer credential
    /// * `RefreshToken` - Token unknown or already revoked
    pub async fn revoke(&self, authorization: Option<&str>) -> Result<(), AuthenticationError> {
        let result: Result<(), AuthenticationError> = match extract_bearer_token(authorization) {
            Ok(token) => self.refresh_tokens.revoke(&token).await.map_err(Into::into),
            Err(e) => Err(e.into()),
        };

        result.inspect_err(|e| log_rejection("revoke", e))
    }
}

fn log_rejection(operation: &'static str, error: &AuthenticationError) {
    match error.class() {
        ErrorClass::Infrastructure => {
            tracing::error!(operation, error = %error, "Authentication infrastructure failure");
        }
        class => {
            tracing::warn!(operation, class = ?class, error = %error, "Authentication rejected");
        }
    }
}
