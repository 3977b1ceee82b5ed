//! Staff login and provisioning handlers.
//!
//! - `POST /staff/login` - exchange username, password and hospital for a session token
//! - `POST /staff/add` - provision a staff account in the caller's hospital

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carehub_storage::{HospitalId, HospitalStorage};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::error::AuthError;
use crate::guard::TenantGuard;
use crate::middleware::TenantContext;
use crate::storage::{Credential, CredentialStore};
use crate::token::TokenIssuer;

/// State for the staff endpoints.
#[derive(Clone)]
pub struct StaffState {
    issuer: Arc<TokenIssuer>,
    credentials: Arc<dyn CredentialStore>,
    hospitals: Arc<dyn HospitalStorage>,
    token_type: String,
}

impl StaffState {
    /// Creates a new staff state.
    pub fn new(
        issuer: Arc<TokenIssuer>,
        credentials: Arc<dyn CredentialStore>,
        hospitals: Arc<dyn HospitalStorage>,
        token_type: impl Into<String>,
    ) -> Self {
        Self {
            issuer,
            credentials,
            hospitals,
            token_type: token_type.into(),
        }
    }

    /// Stores a staff credential after checking it references a registered hospital.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRequest` for a blank username or secret or
    /// an unknown hospital, and `AuthError::Conflict` for a taken username.
    pub async fn provision(&self, credential: Credential) -> AuthResult<Credential> {
        if credential.username.trim().is_empty() {
            return Err(AuthError::invalid_request("username is required"));
        }
        if credential.secret.is_empty() {
            return Err(AuthError::invalid_request("password is required"));
        }
        if self
            .hospitals
            .find_hospital(&credential.hospital_id)
            .await?
            .is_none()
        {
            return Err(AuthError::invalid_request(format!(
                "unknown hospital '{}'",
                credential.hospital_id
            )));
        }

        let created = self.credentials.create(credential).await?;
        tracing::info!(
            username = %created.username,
            hospital_id = %created.hospital_id,
            role = %created.role,
            "Staff account provisioned"
        );
        Ok(created)
    }
}

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub hospital_id: HospitalId,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub token_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// `POST /staff/login`
///
/// Returns 401 with one generic message for every credential failure.
pub async fn login_handler(
    State(state): State<StaffState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let issued = state
        .issuer
        .issue(&request.username, &request.password, &request.hospital_id)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: issued.token,
        token_type: state.token_type.clone(),
        expires_at: issued.expires_at,
    }))
}

// =============================================================================
// Provisioning
// =============================================================================

/// Staff creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub username: String,
    pub password: String,
    pub hospital_id: HospitalId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Staff creation response body.
#[derive(Debug, Serialize)]
pub struct CreateStaffResponse {
    pub message: String,
    pub username: String,
}

/// `POST /staff/add`
///
/// The new account must belong to the caller's hospital.
pub async fn create_staff_handler(
    State(state): State<StaffState>,
    ctx: TenantContext,
    Json(request): Json<CreateStaffRequest>,
) -> Result<Response, AuthError> {
    TenantGuard::authorize_write(&ctx, Some(&request.hospital_id))?;

    let mut credential = Credential::new(request.username, request.password, ctx.hospital_id)
        .with_display_name(request.full_name);
    if let Some(role) = request.role.filter(|r| !r.trim().is_empty()) {
        credential = credential.with_role(role);
    }

    let created = state.provision(credential).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateStaffResponse {
            message: "Staff created successfully".to_string(),
            username: created.username,
        }),
    )
        .into_response())
}
