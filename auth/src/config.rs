use std::env;

use chrono::Duration;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::password::PasswordHashingConfig;

/// Token lifetimes and password hashing profile.
///
/// The signing secret is deliberately absent: callers decode it once at
/// startup and pass raw bytes to [`crate::Authenticator::new`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_days: i64,
    pub password_hashing: PasswordHashingConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_ttl_secs: 60 * 60,
            refresh_token_ttl_days: 60,
            password_hashing: PasswordHashingConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH_ACCESS_TOKEN_TTL_SECS,
    ///    AUTH_PASSWORD_HASHING__MEMORY_COST_KIB, etc.)
    /// 2. Environment-specific config file (config/auth.{environment}.toml)
    /// 3. Default config file (config/auth.toml)
    ///
    /// Every key is optional; missing keys keep their defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/auth").required(false))
            .add_source(File::with_name(&format!("config/auth.{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("AUTH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = configuration.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that both lifetimes are positive and that an expiry computed from
    /// the current time is representable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.access_token_ttl()?;
        self.refresh_token_ttl()?;
        Ok(())
    }

    pub fn access_token_ttl(&self) -> Result<Duration, ConfigError> {
        positive_ttl(
            "access_token_ttl_secs",
            self.access_token_ttl_secs,
            Duration::try_seconds(self.access_token_ttl_secs),
        )
    }

    pub fn refresh_token_ttl(&self) -> Result<Duration, ConfigError> {
        positive_ttl(
            "refresh_token_ttl_days",
            self.refresh_token_ttl_days,
            Duration::try_days(self.refresh_token_ttl_days),
        )
    }
}

fn positive_ttl(key: &str, raw: i64, ttl: Option<Duration>) -> Result<Duration, ConfigError> {
    match ttl {
        Some(ttl) if raw > 0 && Utc::now().checked_add_signed(ttl).is_some() => Ok(ttl),
        _ => Err(ConfigError::Message(format!(
            "{} must be a positive, representable duration (got {})",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(source: &str) -> AuthConfig {
        ConfigBuilder::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .expect("Failed to build configuration")
            .try_deserialize()
            .expect("Failed to deserialize configuration")
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl().unwrap(), Duration::hours(1));
        assert_eq!(config.refresh_token_ttl().unwrap(), Duration::days(60));
        assert_eq!(config.password_hashing.memory_cost_kib, 800_000);
    }

    #[test]
    fn test_partial_override() {
        let config = from_toml(
            r#"
            access_token_ttl_secs = 900

            [password_hashing]
            memory_cost_kib = 65536
            "#,
        );

        assert_eq!(config.access_token_ttl().unwrap(), Duration::minutes(15));
        assert_eq!(config.refresh_token_ttl().unwrap(), Duration::days(60));
        assert_eq!(config.password_hashing.memory_cost_kib, 65536);
        assert_eq!(config.password_hashing.iterations, 1);
        assert_eq!(config.password_hashing.output_len, 16);
    }

    #[test]
    fn test_empty_source_keeps_defaults() {
        assert_eq!(from_toml(""), AuthConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_ttls() {
        let zero_access = AuthConfig {
            access_token_ttl_secs: 0,
            ..AuthConfig::default()
        };
        assert!(zero_access.access_token_ttl().is_err());
        assert!(zero_access.validate().is_err());

        let negative_refresh = AuthConfig {
            refresh_token_ttl_days: -1,
            ..AuthConfig::default()
        };
        assert!(negative_refresh.refresh_token_ttl().is_err());
        assert!(negative_refresh.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_ttls() {
        let huge_access = AuthConfig {
            access_token_ttl_secs: i64::MAX,
            ..AuthConfig::default()
        };
        assert!(huge_access.access_token_ttl().is_err());

        let huge_refresh = AuthConfig {
            refresh_token_ttl_days: i64::MAX,
            ..AuthConfig::default()
        };
        assert!(huge_refresh.refresh_token_ttl().is_err());

        // Representable as a duration, but not as an expiry instant.
        let distant_refresh = AuthConfig {
            refresh_token_ttl_days: 1_000_000_000,
            ..AuthConfig::default()
        };
        assert!(distant_refresh.refresh_token_ttl().is_err());
    }
}
