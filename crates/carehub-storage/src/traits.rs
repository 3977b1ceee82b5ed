//! Storage traits for the record store.
//!
//! This module defines the contracts every storage backend must implement.
//! Tenant-bound operations take a [`TenantScope`] and must apply it as an
//! equality filter on `hospital_id` in addition to any caller filters.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::{Hospital, HospitalId, Patient, PatientQuery, TenantScope};

/// Storage for patient records.
///
/// Implementations must be thread-safe (`Send + Sync`). A record owned by a
/// hospital other than the scope's must never be returned, and must look
/// exactly like a missing record.
///
/// # Example
///
/// ```ignore
/// use carehub_storage::{PatientStorage, StorageError, TenantScope};
///
/// async fn patient_exists(
///     storage: &dyn PatientStorage,
///     scope: &TenantScope,
///     id: &str,
/// ) -> Result<bool, StorageError> {
///     Ok(storage.find_patient(scope, id).await?.is_some())
/// }
/// ```
#[async_trait]
pub trait PatientStorage: Send + Sync {
    /// Reads a patient by identifier within the given scope.
    ///
    /// Returns `None` if no patient with this ID exists in the scope's hospital.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing records.
    async fn find_patient(
        &self,
        scope: &TenantScope,
        id: &str,
    ) -> Result<Option<Patient>, StorageError>;

    /// Returns every patient in the scope's hospital matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn search_patients(
        &self,
        scope: &TenantScope,
        query: &PatientQuery,
    ) -> Result<Vec<Patient>, StorageError>;

    /// Persists a new patient record.
    ///
    /// The record's `hospital_id` must equal the scope's hospital.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the hospital already has a
    /// patient with the same ID.
    /// Returns `StorageError::InvalidResource` if the record is not owned by
    /// the scope's hospital.
    async fn insert_patient(
        &self,
        scope: &TenantScope,
        patient: Patient,
    ) -> Result<Patient, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Storage for the hospital registry.
#[async_trait]
pub trait HospitalStorage: Send + Sync {
    /// Reads a hospital by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues.
    async fn find_hospital(&self, id: &HospitalId) -> Result<Option<Hospital>, StorageError>;

    /// Registers a hospital.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the identifier is taken.
    async fn insert_hospital(&self, hospital: Hospital) -> Result<Hospital, StorageError>;

    /// Lists all registered hospitals ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn list_hospitals(&self) -> Result<Vec<Hospital>, StorageError>;
}
