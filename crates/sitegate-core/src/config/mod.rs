//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every field has a default except the token signing secret.

pub mod auth;
pub mod logging;
pub mod session;

use serde::Deserialize;

pub use self::auth::{AuthConfig, KdfAlgorithm, PasswordConfig, TokenConfig};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::session::{SameSite, SessionConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay) and
/// `SITEGATE__`-prefixed environment variables.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Credential hashing and token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session cookie settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `SITEGATE__`, e.g.
    /// `SITEGATE__AUTH__TOKEN__SECRET`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SITEGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert!(config.auth.token.secret.is_none());
        assert_eq!(config.auth.token.ttl_seconds, 604_800);
        assert_eq!(config.auth.password.algorithm, KdfAlgorithm::Scrypt);
        assert_eq!(config.auth.password.min_length, 8);
        assert_eq!(config.session.cookie_name, "session");
        assert_eq!(config.session.same_site, SameSite::Lax);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [auth.token]
            secret = "0123456789abcdef0123456789abcdef"
            ttl_seconds = 3600

            [auth.password]
            algorithm = "pbkdf2"
            pbkdf2_iterations = 600000

            [session]
            same_site = "strict"

            [logging]
            level = "debug"
            format = "pretty"
            "#,
        )
        .unwrap();

        let secret = config.auth.token.secret.as_ref().unwrap();
        assert_eq!(secret.expose_secret(), "0123456789abcdef0123456789abcdef");
        assert_eq!(config.auth.token.ttl_seconds, 3600);
        assert_eq!(config.auth.password.algorithm, KdfAlgorithm::Pbkdf2);
        assert_eq!(config.auth.password.pbkdf2_iterations, 600_000);
        assert_eq!(config.auth.password.scrypt_log_n, 15);
        assert_eq!(config.session.same_site, SameSite::Strict);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = AppConfig::from_toml(
            r#"
            [auth.token]
            secret = "do-not-print-this-signing-secret!"
            "#,
        )
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("do-not-print-this-signing-secret!"));
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [auth.password]
            algorithm = "sha256"
            "#,
        );
        let err = result.unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
