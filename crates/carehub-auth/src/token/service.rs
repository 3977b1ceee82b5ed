//! Session token issuance.
//!
//! # Usage
//!
//! ```ignore
//! use carehub_auth::token::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(jwt_service, credential_store, time::Duration::hours(24));
//! let issued = issuer.issue("admin01", "password123", &HospitalId::new("1")).await?;
//! ```

use std::sync::Arc;

use carehub_storage::HospitalId;
use time::{Duration, OffsetDateTime};

use crate::AuthResult;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::storage::CredentialStore;
use crate::token::jwt::{JwtService, SessionClaims};

/// A freshly minted session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded, signed token.
    pub token: String,

    /// Claims embedded in the token.
    pub claims: SessionClaims,

    /// When the token stops being accepted.
    pub expires_at: OffsetDateTime,
}

/// Mints session tokens for verified staff credentials.
///
/// Issuance is stateless: nothing is recorded server-side.
pub struct TokenIssuer {
    jwt_service: Arc<JwtService>,
    credentials: Arc<dyn CredentialStore>,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Creates an issuer producing tokens valid for `lifetime`.
    #[must_use]
    pub fn new(
        jwt_service: Arc<JwtService>,
        credentials: Arc<dyn CredentialStore>,
        lifetime: Duration,
    ) -> Self {
        Self {
            jwt_service,
            credentials,
            lifetime,
        }
    }

    /// Creates an issuer using the lifetime from `config`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the lifetime does not fit a
    /// signed duration.
    pub fn from_config(
        jwt_service: Arc<JwtService>,
        credentials: Arc<dyn CredentialStore>,
        config: &AuthConfig,
    ) -> AuthResult<Self> {
        let lifetime = Duration::try_from(config.token_lifetime)
            .map_err(|e| AuthError::configuration(format!("token_lifetime: {e}")))?;
        Ok(Self::new(jwt_service, credentials, lifetime))
    }

    /// Token lifetime.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Verifies credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown, the
    /// secret does not match, or `claimed_hospital_id` is not the credential's
    /// hospital. The three cases are indistinguishable to the caller.
    pub async fn issue(
        &self,
        username: &str,
        secret: &str,
        claimed_hospital_id: &HospitalId,
    ) -> AuthResult<IssuedToken> {
        self.issue_at(username, secret, claimed_hospital_id, OffsetDateTime::now_utc())
            .await
    }

    /// Same as [`issue`](Self::issue) with an explicit issuance time.
    ///
    /// # Errors
    ///
    /// See [`issue`](Self::issue).
    pub async fn issue_at(
        &self,
        username: &str,
        secret: &str,
        claimed_hospital_id: &HospitalId,
        now: OffsetDateTime,
    ) -> AuthResult<IssuedToken> {
        let Some(credential) = self.credentials.find(username).await? else {
            tracing::debug!(username = %username, reason = "unknown_user", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !credential.secret_matches(secret) {
            tracing::debug!(username = %username, reason = "secret_mismatch", "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        if &credential.hospital_id != claimed_hospital_id {
            tracing::debug!(
                username = %username,
                reason = "hospital_mismatch",
                "Login rejected"
            );
            return Err(AuthError::InvalidCredentials);
        }

        let claims = SessionClaims::new(
            self.jwt_service.issuer(),
            &credential.username,
            credential.hospital_id,
            now,
            self.lifetime,
        );
        let token = self
            .jwt_service
            .encode(&claims)
            .map_err(|e| AuthError::internal(e.to_string()))?;

        tracing::info!(
            username = %claims.sub,
            hospital_id = %claims.hospital_id,
            "Session token issued"
        );

        Ok(IssuedToken {
            token,
            expires_at: now + self.lifetime,
            claims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Credential, MemoryCredentialStore};

    async fn issuer() -> TokenIssuer {
        let store = MemoryCredentialStore::new();
        store
            .create(Credential::new("admin01", "password123", "1"))
            .await
            .unwrap();
        TokenIssuer::new(
            Arc::new(JwtService::new(b"secret", "carehub")),
            Arc::new(store),
            Duration::hours(24),
        )
    }

    #[tokio::test]
    async fn test_issue_valid_credentials() {
        let issuer = issuer().await;
        let issued = issuer
            .issue("admin01", "password123", &HospitalId::new("1"))
            .await
            .unwrap();

        assert!(!issued.token.is_empty());
        assert_eq!(issued.claims.hospital_id, HospitalId::new("1"));
        assert_eq!(issued.claims.sub, "admin01");
        assert_eq!(issued.claims.exp - issued.claims.iat, 24 * 3600);
    }

    #[tokio::test]
    async fn test_all_failures_look_identical() {
        let issuer = issuer().await;
        let cases = [
            ("nobody", "password123", "1"),
            ("admin01", "wrong", "1"),
            ("admin01", "password123", "2"),
        ];

        for (username, secret, hospital) in cases {
            let err = issuer
                .issue(username, secret, &HospitalId::new(hospital))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(err.to_string(), "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_issued_token_decodes_to_claims() {
        let issuer = issuer().await;
        let issued = issuer
            .issue("admin01", "password123", &HospitalId::new("1"))
            .await
            .unwrap();

        let decoded = JwtService::new(b"secret", "carehub")
            .decode(&issued.token)
            .unwrap()
            .claims;
        assert_eq!(decoded, issued.claims);
    }

    #[test]
    fn test_from_config_uses_lifetime() {
        let config = AuthConfig {
            jwt_secret: "k".to_string(),
            token_lifetime: std::time::Duration::from_secs(60),
            ..Default::default()
        };
        let issuer = TokenIssuer::from_config(
            Arc::new(JwtService::new(b"k", "carehub")),
            Arc::new(MemoryCredentialStore::new()),
            &config,
        )
        .unwrap();
        assert_eq!(issuer.lifetime(), Duration::minutes(1));
    }
}
