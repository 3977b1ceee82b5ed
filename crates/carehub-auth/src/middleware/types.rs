//! Request-scoped tenant context.

use carehub_storage::{HospitalId, TenantScope};

use crate::token::jwt::SessionClaims;

/// Identity established for one authenticated request.
///
/// Built from verified [`SessionClaims`] by the authentication middleware and
/// stored in the request extensions. It lives exactly as long as the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    /// Username of the session holder.
    pub username: String,

    /// Hospital every operation of this request is confined to.
    pub hospital_id: HospitalId,

    /// Token expiration (Unix timestamp).
    pub expires_at: i64,
}

impl TenantContext {
    /// Storage scope for this request's hospital.
    #[must_use]
    pub fn scope(&self) -> TenantScope {
        TenantScope::new(self.hospital_id.clone())
    }
}

impl From<SessionClaims> for TenantContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            username: claims.sub,
            hospital_id: claims.hospital_id,
            expires_at: claims.exp,
        }
    }
}
