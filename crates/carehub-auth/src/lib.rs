//! # carehub-auth
//!
//! Tenant-scoped authentication and authorization for CareHub.
//!
//! This crate provides:
//! - Staff credential lookup
//! - Session token issuance and verification (HS256 JWT)
//! - The tenant guard every patient operation goes through
//! - Axum middleware, extractors and error responses
//!
//! ## Request flow
//!
//! `POST /staff/login` runs the [`TokenIssuer`]. Every protected request then
//! passes [`authentication_middleware`], which verifies the token with the
//! [`TokenVerifier`] and publishes a [`TenantContext`]. Handlers hand that
//! context to the [`TenantGuard`] before touching the record store.
//!
//! ## Modules
//!
//! - [`config`] - Token signing configuration
//! - [`token`] - Session claims, issuance and verification
//! - [`middleware`] - HTTP middleware and tenant context
//! - [`guard`] - Tenant read and write rules
//! - [`storage`] - Credential storage
//! - [`http`] - Axum handlers for staff endpoints

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod middleware;
pub mod storage;
pub mod token;

pub use config::{AuthConfig, ConfigError};
pub use error::{AuthError, ErrorCategory};
pub use guard::TenantGuard;
pub use http::{StaffState, create_staff_handler, login_handler};
pub use middleware::{AuthState, TenantContext, authentication_middleware};
pub use storage::{Credential, CredentialStore, MemoryCredentialStore};
pub use token::{IssuedToken, JwtService, SessionClaims, TokenIssuer, TokenVerifier};

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
