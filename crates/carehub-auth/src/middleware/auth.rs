//! Bearer token authentication middleware and tenant extractor.
//!
//! The middleware runs before any protected handler. It verifies the
//! `Authorization` header and, on success, stores a [`TenantContext`] in the
//! request extensions. Handlers take `TenantContext` as an extractor; when
//! the context is absent the extractor rejects, so a route that was mounted
//! without the middleware fails closed.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AuthError;
use crate::token::TokenVerifier;

use super::types::TenantContext;

// =============================================================================
// Auth State
// =============================================================================

/// State required for bearer token authentication.
///
/// Include it in the application state and expose it via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    /// Verifier for session tokens.
    pub verifier: Arc<TokenVerifier>,
}

impl AuthState {
    /// Creates a new auth state.
    #[must_use]
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

// =============================================================================
// Authentication Middleware
// =============================================================================

/// Verifies the session token and injects a [`TenantContext`].
///
/// On any verification failure the request is answered with 401 and the
/// inner service is never called.
pub async fn authentication_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let header = match req.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(value) => Some(value),
            Err(_) => {
                return AuthError::malformed_token("authorization header is not valid text")
                    .into_response();
            }
        },
    };

    match state.verifier.verify(header) {
        Ok(claims) => {
            tracing::debug!(
                username = %claims.sub,
                hospital_id = %claims.hospital_id,
                "Token validated successfully"
            );
            req.extensions_mut().insert(TenantContext::from(claims));
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(
                path = %req.uri().path(),
                kind = e.kind(),
                category = %e.category(),
                error = %e,
                "Token validation failed"
            );
            e.into_response()
        }
    }
}

// =============================================================================
// Tenant Context Extractor
// =============================================================================

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}
