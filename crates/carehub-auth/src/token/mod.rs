//! Session token issuance and verification.
//!
//! This module provides:
//!
//! - JWT encoding and decoding of [`SessionClaims`]
//! - Login-time issuance ([`TokenIssuer`])
//! - Per-request verification ([`TokenVerifier`])

pub mod jwt;
pub mod service;
pub mod verifier;

pub use jwt::{JwtError, JwtService, SessionClaims};
pub use service::{IssuedToken, TokenIssuer};
pub use verifier::TokenVerifier;
