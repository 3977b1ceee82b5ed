//! Storage traits for auth-related data.
//!
//! - [`CredentialStore`] - staff identity records, looked up at login

pub mod credential;
pub mod memory;

pub use credential::{Credential, CredentialStore, secret_digest};
pub use memory::MemoryCredentialStore;
