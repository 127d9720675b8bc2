//! PostgreSQL adapters for the `chirpy-auth` storage ports.
//!
//! Schema lives in `migrations/`; apply it with [`run_migrations`] at
//! startup before handing the pool to the stores.

pub mod credentials;
pub mod refresh_token;

pub use credentials::PostgresCredentialStore;
pub use refresh_token::PostgresRefreshTokenStore;

use sqlx::migrate::MigrateError;
use sqlx::PgPool;

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!(database = "postgresql", "Auth migrations completed");
    Ok(())
}
