//! Record store contract for CareHub.
//!
//! This crate defines the interface the tenant-scoped core consumes:
//!
//! - [`PatientStorage`] - tenant-bound patient records, always queried through a [`TenantScope`]
//! - [`HospitalStorage`] - the hospital registry that staff and patients reference
//! - [`InMemoryStorage`] - a concurrent in-process backend implementing both
//!
//! # Example
//!
//! ```ignore
//! use carehub_storage::{HospitalId, InMemoryStorage, PatientQuery, PatientStorage, TenantScope};
//!
//! let storage = InMemoryStorage::new();
//! let scope = TenantScope::new(HospitalId::new("1"));
//! let patients = storage.search_patients(&scope, &PatientQuery::default()).await?;
//! ```

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::StorageError;
pub use memory::InMemoryStorage;
pub use traits::{HospitalStorage, PatientStorage};
pub use types::{
    Demographics, Hospital, HospitalId, NewPatient, Patient, PatientQuery, TenantScope,
    parse_date,
};

/// Type alias for a shareable patient store.
pub type DynPatientStorage = std::sync::Arc<dyn PatientStorage>;

/// Type alias for a shareable hospital registry.
pub type DynHospitalStorage = std::sync::Arc<dyn HospitalStorage>;
