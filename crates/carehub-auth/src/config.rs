//! Authentication configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! jwt_secret = "change-me"
//! issuer = "carehub"
//! token_lifetime = "24h"
//! scheme = "Bearer"
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default session token lifetime.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Token signing and verification settings.
///
/// The signing secret is read once at startup and never changes for the
/// lifetime of the process. Rotating it invalidates every issued token.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Symmetric HS256 signing secret.
    pub jwt_secret: String,

    /// Value of the token `iss` claim, checked on verification.
    pub issuer: String,

    /// How long an issued token stays valid.
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,

    /// Authorization scheme expected in front of the token.
    pub scheme: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "carehub".to_string(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            scheme: "Bearer".to_string(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_lifetime", &self.token_lifetime)
            .field("scheme", &self.scheme)
            .finish()
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the signing secret is empty.
    /// Returns `ConfigError::InvalidValue` if the issuer or scheme is empty or
    /// the token lifetime is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("auth.jwt_secret".to_string()));
        }

        if self.issuer.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "issuer cannot be empty".to_string(),
            ));
        }

        if self.token_lifetime.is_zero() {
            return Err(ConfigError::InvalidValue(
                "token_lifetime must be > 0".to_string(),
            ));
        }

        if self.scheme.trim().is_empty() || self.scheme.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue(format!(
                "Invalid authorization scheme: '{}'",
                self.scheme
            )));
        }

        Ok(())
    }
}
