use async_trait::async_trait;
use auth::store::CredentialStore;
use auth::store::StoreError;
use auth::EmailAddress;
use auth::UserCredentials;
use auth::UserId;
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only view of the `users` table's login columns.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: Uuid,
    email: String,
    hashed_password: String,
}

impl TryFrom<CredentialsRow> for UserCredentials {
    type Error = StoreError;

    fn try_from(row: CredentialsRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(row.email)
            .map_err(|e| StoreError::DatabaseError(format!("Stored email is invalid: {}", e)))?;

        Ok(Self {
            user_id: UserId(row.id),
            email,
            password_hash: row.hashed_password,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT id, email, hashed_password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        row.map(UserCredentials::try_from).transpose()
    }

    async fn find_credentials_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT id, email, hashed_password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        row.map(UserCredentials::try_from).transpose()
    }
}
