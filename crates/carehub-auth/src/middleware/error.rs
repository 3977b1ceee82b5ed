//! Error response handling.
//!
//! This module implements `IntoResponse` for `AuthError`, producing
//! OperationOutcome-shaped JSON bodies. The three token failure kinds share a
//! single client-visible diagnostic; server-side details are logged only.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

/// Diagnostic returned for every token verification failure.
pub const TOKEN_REJECTED_MESSAGE: &str = "Missing, invalid or expired session token";

/// Diagnostic returned for every login failure.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username, password or hospital";

const SERVER_ERROR_MESSAGE: &str = "Internal server error";

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, issue_code, message) = error_details(&self);

        if self.is_server_error() {
            tracing::error!(
                kind = self.kind(),
                category = %self.category(),
                error = %self,
                "Request failed"
            );
        }

        let body = operation_outcome_json("error", issue_code, error_code, &message);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        if status == StatusCode::UNAUTHORIZED {
            let www_auth = build_www_authenticate_header(bearer_error_code(&self), &message);
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// Extracts error details from an AuthError.
///
/// Returns (HTTP status, error code, issue code, client-visible message).
fn error_details(error: &AuthError) -> (StatusCode, &'static str, &'static str, String) {
    match error {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "security",
            INVALID_CREDENTIALS_MESSAGE.to_string(),
        ),
        AuthError::MissingToken
        | AuthError::MalformedToken { .. }
        | AuthError::InvalidOrExpiredToken { .. } => (
            StatusCode::UNAUTHORIZED,
            "invalid_token",
            "security",
            TOKEN_REJECTED_MESSAGE.to_string(),
        ),
        AuthError::Forbidden { message } => (
            StatusCode::FORBIDDEN,
            "access_denied",
            "forbidden",
            message.clone(),
        ),
        AuthError::NotFound { kind, id } => (
            StatusCode::NOT_FOUND,
            "not_found",
            "not-found",
            format!("{kind} '{id}' not found"),
        ),
        AuthError::InvalidRequest { message } => (
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "invalid",
            message.clone(),
        ),
        AuthError::Conflict { message } => (
            StatusCode::CONFLICT,
            "conflict",
            "duplicate",
            message.clone(),
        ),
        AuthError::Storage { .. } | AuthError::Configuration { .. } | AuthError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_error",
            "exception",
            SERVER_ERROR_MESSAGE.to_string(),
        ),
    }
}

/// Bearer challenge error code (RFC 6750 section 3.1).
///
/// A request without any token gets a bare challenge.
fn bearer_error_code(error: &AuthError) -> Option<&'static str> {
    match error {
        AuthError::MissingToken => None,
        AuthError::MalformedToken { .. } => Some("invalid_request"),
        AuthError::InvalidOrExpiredToken { .. } => Some("invalid_token"),
        _ => Some("invalid_credentials"),
    }
}

/// Builds the WWW-Authenticate header value for 401 responses.
///
/// Format: `Bearer realm="carehub", error="invalid_token", error_description="..."`
fn build_www_authenticate_header(error: Option<&str>, description: &str) -> String {
    let Some(error) = error else {
        return "Bearer realm=\"carehub\"".to_string();
    };
    let escaped_desc = description.replace('\"', "\\\"");
    format!(
        "Bearer realm=\"carehub\", error=\"{}\", error_description=\"{}\"",
        error, escaped_desc
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates an OperationOutcome JSON body for an error.
#[must_use]
pub fn operation_outcome_json(
    severity: &str,
    code: &str,
    error_code: &str,
    diagnostics: &str,
) -> serde_json::Value {
    json!({
        "resourceType": "OperationOutcome",
        "issue": [{
            "severity": severity,
            "code": code,
            "details": {
                "coding": [{
                    "code": error_code
                }]
            },
            "diagnostics": diagnostics
        }]
    })
}

// =============================================================================
// Tests
// =============================================================================
