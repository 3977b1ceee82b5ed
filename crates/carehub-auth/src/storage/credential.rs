//! Staff credential storage trait.
//!
//! Defines the interface for staff identity lookups. Implementations are
//! provided by storage backends.

use std::fmt;

use async_trait::async_trait;
use carehub_storage::HospitalId;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::AuthResult;

/// Role assigned to staff accounts created without an explicit one.
pub const DEFAULT_ROLE: &str = "staff";

/// A staff identity record.
///
/// Created at provisioning time and immutable afterwards. `hospital_id`
/// is the only hospital the staff member can ever obtain a session for.
#[derive(Clone, Deserialize)]
pub struct Credential {
    /// Unique login name.
    pub username: String,

    /// Login secret.
    pub secret: String,

    /// Hospital the staff member belongs to.
    pub hospital_id: HospitalId,

    /// Name shown in the UI.
    #[serde(default)]
    pub display_name: String,

    /// Staff role.
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

impl Credential {
    /// Creates a credential with the default role.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        secret: impl Into<String>,
        hospital_id: impl Into<HospitalId>,
    ) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
            hospital_id: hospital_id.into(),
            display_name: String::new(),
            role: default_role(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Checks a candidate secret against the stored one.
    ///
    /// Both sides are reduced to SHA-256 digests first so the comparison runs
    /// over equal-length inputs.
    #[must_use]
    pub fn secret_matches(&self, candidate: &str) -> bool {
        Sha256::digest(self.secret.as_bytes()) == Sha256::digest(candidate.as_bytes())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("hospital_id", &self.hospital_id)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .finish()
    }
}

/// Hex-encoded SHA-256 digest of a secret.
///
/// Used where a stable, non-reversible fingerprint of a secret is needed,
/// for example to tell whether two configurations share a signing key.
#[must_use]
pub fn secret_digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Storage for staff credentials.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds a credential by username.
    ///
    /// Returns `None` if no credential with this username exists.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn find(&self, username: &str) -> AuthResult<Option<Credential>>;

    /// Stores a new credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Conflict` if the username is already taken.
    async fn create(&self, credential: Credential) -> AuthResult<Credential>;
}
