//! In-memory credential store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::credential::{Credential, CredentialStore};
use crate::AuthResult;
use crate::error::AuthError;

/// Credential store backed by a concurrent map keyed by username.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: DashMap<String, Credential>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Returns `true` if no credentials are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find(&self, username: &str) -> AuthResult<Option<Credential>> {
        Ok(self
            .credentials
            .get(username)
            .map(|entry| entry.value().clone()))
    }

    async fn create(&self, credential: Credential) -> AuthResult<Credential> {
        if credential.username.trim().is_empty() {
            return Err(AuthError::invalid_request("username must not be empty"));
        }
        match self.credentials.entry(credential.username.clone()) {
            Entry::Occupied(_) => Err(AuthError::conflict(format!(
                "Staff '{}' already exists",
                credential.username
            ))),
            Entry::Vacant(slot) => {
                slot.insert(credential.clone());
                Ok(credential)
            }
        }
    }
}
