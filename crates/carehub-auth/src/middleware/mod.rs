//! HTTP middleware for authentication.
//!
//! This module provides Axum integration for:
//!
//! - Bearer token verification on protected routes
//! - Tenant context injection into request extensions
//! - OperationOutcome error responses
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use carehub_auth::middleware::{AuthState, TenantContext, authentication_middleware};
//!
//! async fn protected_handler(ctx: TenantContext) -> String {
//!     format!("Hello, {} of hospital {}!", ctx.username, ctx.hospital_id)
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(middleware::from_fn_with_state(auth_state, authentication_middleware));
//! ```

pub mod auth;
pub mod error;
pub mod types;

pub use auth::{AuthState, authentication_middleware};
pub use error::operation_outcome_json;
pub use types::TenantContext;
