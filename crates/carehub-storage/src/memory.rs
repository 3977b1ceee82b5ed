//! In-memory record store.
//!
//! Patients are keyed by `(hospital_id, id)`, so identifiers only need to be
//! unique within a hospital and a lookup can never cross into another tenant.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::StorageError;
use crate::traits::{HospitalStorage, PatientStorage};
use crate::types::{Hospital, HospitalId, Patient, PatientQuery, TenantScope};

pub type StorageKey = (HospitalId, String);

pub(crate) fn make_storage_key(hospital_id: &HospitalId, id: &str) -> StorageKey {
    (hospital_id.clone(), id.to_string())
}

/// In-memory storage backend using `DashMap` for concurrent access.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    patients: DashMap<StorageKey, Patient>,
    hospitals: DashMap<HospitalId, Hospital>,
}

impl InMemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of patient records across all hospitals.
    #[must_use]
    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }
}

#[async_trait]
impl PatientStorage for InMemoryStorage {
    async fn find_patient(
        &self,
        scope: &TenantScope,
        id: &str,
    ) -> Result<Option<Patient>, StorageError> {
        let key = make_storage_key(scope.hospital_id(), id);
        Ok(self.patients.get(&key).map(|entry| entry.value().clone()))
    }

    async fn search_patients(
        &self,
        scope: &TenantScope,
        query: &PatientQuery,
    ) -> Result<Vec<Patient>, StorageError> {
        let mut found: Vec<Patient> = self
            .patients
            .iter()
            .filter(|entry| scope.owns(&entry.value().hospital_id))
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn insert_patient(
        &self,
        scope: &TenantScope,
        patient: Patient,
    ) -> Result<Patient, StorageError> {
        if !scope.owns(&patient.hospital_id) {
            return Err(StorageError::invalid_resource(
                "patient hospital does not match the storage scope",
            ));
        }

        let key = make_storage_key(&patient.hospital_id, &patient.id);
        match self.patients.entry(key) {
            Entry::Occupied(_) => Err(StorageError::already_exists("Patient", patient.id)),
            Entry::Vacant(slot) => {
                slot.insert(patient.clone());
                tracing::debug!(
                    hospital_id = %patient.hospital_id,
                    patient_id = %patient.id,
                    "Patient stored"
                );
                Ok(patient)
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl HospitalStorage for InMemoryStorage {
    async fn find_hospital(&self, id: &HospitalId) -> Result<Option<Hospital>, StorageError> {
        Ok(self.hospitals.get(id).map(|entry| entry.value().clone()))
    }

    async fn insert_hospital(&self, hospital: Hospital) -> Result<Hospital, StorageError> {
        if hospital.id.is_blank() {
            return Err(StorageError::invalid_resource("hospital id must not be empty"));
        }
        match self.hospitals.entry(hospital.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::already_exists(
                "Hospital",
                hospital.id.as_str(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(hospital.clone());
                Ok(hospital)
            }
        }
    }

    async fn list_hospitals(&self) -> Result<Vec<Hospital>, StorageError> {
        let mut hospitals: Vec<Hospital> = self
            .hospitals
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        hospitals.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(hospitals)
    }
}
