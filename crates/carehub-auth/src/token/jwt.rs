//! Session token encoding and decoding.
//!
//! Tokens are HS256-signed JWTs under a single process-wide secret. The claim
//! set is fixed: a token that lacks `hospital_id`, or carries it with the
//! wrong type, fails to decode instead of producing a partial claim.
//!
//! ## Example
//!
//! ```ignore
//! use carehub_auth::token::jwt::{JwtService, SessionClaims};
//!
//! let jwt_service = JwtService::new(b"secret", "carehub");
//! let token = jwt_service.encode(&claims)?;
//! let decoded = jwt_service.decode(&token)?.claims;
//! ```

use std::fmt;

use carehub_storage::HospitalId;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    EncodingError {
        /// Description of the encoding error.
        message: String,
    },

    /// The input is not a structurally valid token.
    #[error("Failed to decode token: {message}")]
    DecodingError {
        /// Description of the decoding error.
        message: String,
    },

    /// The token has expired.
    #[error("Token expired")]
    Expired,

    /// The token signature is invalid.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The token claims are invalid.
    #[error("Invalid claims: {message}")]
    InvalidClaims {
        /// Description of why claims are invalid.
        message: String,
    },

    /// A required claim is missing.
    #[error("Missing required claim: {claim}")]
    MissingClaim {
        /// Name of the missing claim.
        claim: String,
    },
}

impl JwtError {
    /// Creates a new `EncodingError`.
    #[must_use]
    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    /// Creates a new `DecodingError`.
    #[must_use]
    pub fn decoding_error(message: impl Into<String>) -> Self {
        Self::DecodingError {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidClaims` error.
    #[must_use]
    pub fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims {
            message: message.into(),
        }
    }

    /// Creates a new `MissingClaim` error.
    #[must_use]
    pub fn missing_claim(claim: impl Into<String>) -> Self {
        Self::MissingClaim {
            claim: claim.into(),
        }
    }

    /// Returns `true` if the token parsed but was rejected by validation.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::Expired | Self::InvalidSignature | Self::InvalidClaims { .. }
        )
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature => Self::invalid_claims(err.to_string()),
            ErrorKind::MissingRequiredClaim(claim) => Self::missing_claim(claim.clone()),
            _ => Self::decoding_error(err.to_string()),
        }
    }
}

// ============================================================================
// Session Claims
// ============================================================================

/// Claims carried by a session token.
///
/// Derived from a credential at login, never persisted server-side, and
/// reconstructed from the token on every protected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer.
    pub iss: String,

    /// Username of the authenticated staff member.
    pub sub: String,

    /// Hospital the session is confined to.
    pub hospital_id: HospitalId,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims issued at `issued_at` and valid for `lifetime`.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        username: impl Into<String>,
        hospital_id: HospitalId,
        issued_at: OffsetDateTime,
        lifetime: time::Duration,
    ) -> Self {
        Self {
            iss: issuer.into(),
            sub: username.into(),
            hospital_id,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + lifetime).unix_timestamp(),
        }
    }

    /// Username of the session holder.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Returns `true` if the token is no longer valid at `now`.
    ///
    /// A token expiring exactly at `now` is already expired.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.exp <= now.unix_timestamp()
    }
}

// ============================================================================
// JWT Service
// ============================================================================

/// Service for encoding and decoding session tokens.
///
/// This service is thread-safe (`Send + Sync`) and can be shared across
/// async tasks. Keys are fixed at construction.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Creates a new JWT service.
    ///
    /// # Arguments
    /// * `secret` - The symmetric HS256 signing secret
    /// * `issuer` - The issuer claim value
    #[must_use]
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
        }
    }

    /// Encodes claims into a JWT string.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::encoding_error(e.to_string()))
    }

    /// Decodes and validates a JWT string.
    ///
    /// Signature, issuer and expiry are all checked, with no clock leeway.
    ///
    /// # Errors
    /// Returns an error if decoding or validation fails.
    pub fn decode(&self, token: &str) -> Result<TokenData<SessionClaims>, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(JwtError::from)
    }

    /// Returns the issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
