use std::sync::Arc;

use auth::store::InMemoryCredentialStore;
use auth::store::InMemoryRefreshTokenStore;
use auth::AccessTokenCodec;
use auth::AccessTokenError;
use auth::AuthConfig;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::EmailAddress;
use auth::PasswordHashingConfig;
use auth::RefreshTokenError;
use auth::RefreshTokenManager;
use auth::UserCredentials;
use auth::UserId;
use chrono::Duration;

const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

struct TestApp {
    authenticator: Authenticator<InMemoryCredentialStore, InMemoryRefreshTokenStore>,
    refresh_tokens: RefreshTokenManager<InMemoryRefreshTokenStore>,
    codec: AccessTokenCodec,
    user_id: UserId,
}

impl TestApp {
    /// Build an authenticator over in-memory stores with one registered user
    async fn spawn(email: &str, password: &str) -> Self {
        let config = AuthConfig {
            password_hashing: PasswordHashingConfig {
                memory_cost_kib: 1024,
                ..PasswordHashingConfig::default()
            },
            ..AuthConfig::default()
        };

        let credentials = Arc::new(InMemoryCredentialStore::new());
        let refresh_store = Arc::new(InMemoryRefreshTokenStore::new());

        let authenticator = Authenticator::new(
            SECRET,
            &config,
            Arc::clone(&credentials),
            Arc::clone(&refresh_store),
        )
        .expect("Failed to build authenticator");

        let user_id = UserId::new();
        credentials
            .insert(UserCredentials {
                user_id,
                email: EmailAddress::new(email.to_string()).unwrap(),
                password_hash: authenticator
                    .hash_password(password)
                    .expect("Failed to hash password"),
            })
            .await;

        Self {
            authenticator,
            refresh_tokens: RefreshTokenManager::new(
                refresh_store,
                config.refresh_token_ttl().unwrap(),
            ),
            codec: AccessTokenCodec::new(SECRET),
            user_id,
        }
    }
}

#[tokio::test]
async fn test_login_yields_tokens_for_the_same_identity() {
    let app = TestApp::spawn("saul@example.com", "pass_word!").await;

    let session = app
        .authenticator
        .login("saul@example.com", "pass_word!")
        .await
        .expect("Login failed");

    assert_eq!(app.codec.validate(&session.access_token), Ok(app.user_id));
    assert_eq!(
        app.refresh_tokens.check_valid(&session.refresh_token).await,
        Ok(app.user_id)
    );
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
    let app = TestApp::spawn("saul@example.com", "pass_word!").await;

    let wrong_password = app
        .authenticator
        .login("saul@example.com", "pass_w0rd!")
        .await
        .unwrap_err();
    let unknown_user = app
        .authenticator
        .login("kim@example.com", "pass_word!")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert_eq!(wrong_password.status_code(), unknown_user.status_code());
    assert_eq!(wrong_password.public_message(), unknown_user.public_message());
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let app = TestApp::spawn("saul@example.com", "pass_word!").await;
    let session = app
        .authenticator
        .login("saul@example.com", "pass_word!")
        .await
        .unwrap();

    let access_header = format!("Bearer {}", session.access_token);
    let refresh_header = format!("Bearer   {}  ", session.refresh_token);

    assert_eq!(
        app.authenticator.authenticate(Some(&access_header)).unwrap(),
        app.user_id
    );

    let renewed = app
        .authenticator
        .refresh(Some(&refresh_header))
        .await
        .expect("Refresh failed");
    assert_eq!(app.codec.validate(&renewed), Ok(app.user_id));

    app.authenticator
        .revoke(Some(&refresh_header))
        .await
        .expect("Revoke failed");

    assert_eq!(
        app.refresh_tokens.check_valid(&session.refresh_token).await,
        Err(RefreshTokenError::Revoked)
    );
    assert!(matches!(
        app.authenticator.revoke(Some(&refresh_header)).await,
        Err(AuthenticationError::RefreshToken(
            RefreshTokenError::AlreadyRevoked
        ))
    ));
}

#[tokio::test]
async fn test_access_token_from_other_deployment_is_rejected() {
    let app = TestApp::spawn("saul@example.com", "pass_word!").await;
    let foreign = AccessTokenCodec::new(b"some-other-deployment-secret")
        .issue(app.user_id, Duration::minutes(5))
        .unwrap();

    let result = app
        .authenticator
        .authenticate(Some(&format!("Bearer {}", foreign)));
    assert!(matches!(
        result,
        Err(AuthenticationError::AccessToken(
            AccessTokenError::InvalidSignature
        ))
    ));
}
