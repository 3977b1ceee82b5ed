//! Session token verification.
//!
//! [`TokenVerifier::verify`] takes the raw `Authorization` header value and
//! either returns the decoded [`SessionClaims`] or a terminal error:
//!
//! - absent, empty or scheme-only header: `MissingToken`
//! - unknown scheme or unparseable token: `MalformedToken`
//! - bad signature, foreign issuer or `exp <= now`: `InvalidOrExpiredToken`

use std::sync::Arc;

use time::OffsetDateTime;

use crate::AuthResult;
use crate::error::AuthError;
use crate::token::jwt::{JwtError, JwtService, SessionClaims};

/// Validates session tokens presented on protected requests.
///
/// Pure and stateless apart from the immutable signing key, so one instance
/// is shared by every request.
pub struct TokenVerifier {
    jwt_service: Arc<JwtService>,
    scheme: String,
}

impl TokenVerifier {
    /// Creates a verifier accepting tokens prefixed with `scheme`.
    #[must_use]
    pub fn new(jwt_service: Arc<JwtService>, scheme: impl Into<String>) -> Self {
        Self {
            jwt_service,
            scheme: scheme.into(),
        }
    }

    /// Authorization scheme this verifier accepts.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Verifies a raw `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken`, `MalformedToken` or `InvalidOrExpiredToken`
    /// as described in the module docs.
    pub fn verify(&self, raw_header_value: Option<&str>) -> AuthResult<SessionClaims> {
        self.verify_at(raw_header_value, OffsetDateTime::now_utc())
    }

    /// Same as [`verify`](Self::verify) with an explicit current time.
    ///
    /// # Errors
    ///
    /// See [`verify`](Self::verify).
    pub fn verify_at(
        &self,
        raw_header_value: Option<&str>,
        now: OffsetDateTime,
    ) -> AuthResult<SessionClaims> {
        let raw = raw_header_value.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let token = strip_scheme(raw, &self.scheme)
            .ok_or_else(|| AuthError::malformed_token("unsupported authorization scheme"))?
            .trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = self.jwt_service.decode(token).map_err(AuthError::from)?.claims;

        // The library check allows exp == now; a token is dead at its expiry second.
        if claims.is_expired_at(now) {
            return Err(AuthError::invalid_or_expired("token has expired"));
        }

        if claims.hospital_id.is_blank() {
            return Err(AuthError::malformed_token("empty hospital_id claim"));
        }

        Ok(claims)
    }
}

/// Splits off a case-insensitive `scheme` prefix, returning the remainder.
fn strip_scheme<'a>(value: &'a str, scheme: &str) -> Option<&'a str> {
    let (prefix, rest) = value
        .split_once(char::is_whitespace)
        .unwrap_or((value, ""));
    prefix.eq_ignore_ascii_case(scheme).then_some(rest)
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::invalid_or_expired("token has expired"),
            JwtError::InvalidSignature => Self::invalid_or_expired("signature does not verify"),
            JwtError::InvalidClaims { message } => Self::invalid_or_expired(message),
            JwtError::MissingClaim { claim } => {
                Self::malformed_token(format!("missing claim: {claim}"))
            }
            JwtError::DecodingError { message } => Self::malformed_token(message),
            JwtError::EncodingError { message } => Self::internal(message),
        }
    }
}
