//! Credential and session-token subsystem
//!
//! Provides the authentication building blocks of the chirpy service:
//! - Password hashing (Argon2id, PHC strings)
//! - `Authorization` header parsing (`ApiKey` / `Bearer`)
//! - Short-lived signed access tokens (HS256 JWT)
//! - Long-lived opaque refresh tokens with server-side revocation
//! - An [`Authenticator`] coordinating login, refresh and revoke
//!
//! Persistence is reached through the [`store::RefreshTokenStore`] and
//! [`store::CredentialStore`] ports; in-memory adapters live in
//! [`store::memory`], PostgreSQL adapters in the `chirpy-auth-postgres` crate.
//!
//! # Examples
//!
//! ## Header Extraction
//! ```
//! use auth::credentials::extract_bearer_token;
//!
//! assert_eq!(extract_bearer_token(Some("Bearer   abc ")).unwrap(), "abc");
//! assert!(extract_bearer_token(Some("Basic abc")).is_err());
//! assert!(extract_bearer_token(None).is_err());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{AccessTokenCodec, UserId};
//! use chrono::Duration;
//!
//! let codec = AccessTokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let user_id = UserId::new();
//! let token = codec.issue(user_id, Duration::hours(1)).unwrap();
//! assert_eq!(codec.validate(&token).unwrap(), user_id);
//! ```
//!
//! ## Password Hashing
//! ```
//! use auth::{PasswordHasher, PasswordHashingConfig};
//!
//! // The default profile needs 800 MB per hash; a cheaper one is used here.
//! let hasher = PasswordHasher::with_config(PasswordHashingConfig {
//!     memory_cost_kib: 1024,
//!     ..PasswordHashingConfig::default()
//! })
//! .unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```

pub mod authenticator;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod store;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::Session;
pub use config::AuthConfig;
pub use credentials::Credential;
pub use credentials::CredentialError;
pub use credentials::Scheme;
pub use errors::ErrorClass;
pub use identity::EmailAddress;
pub use identity::UserCredentials;
pub use identity::UserId;
pub use jwt::AccessTokenCodec;
pub use jwt::AccessTokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordHashingConfig;
pub use refresh::RefreshTokenError;
pub use refresh::RefreshTokenManager;
pub use refresh::RefreshTokenRecord;
pub use store::StoreError;
