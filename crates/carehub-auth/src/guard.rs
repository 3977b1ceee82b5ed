//! Tenant-scoped access guard.
//!
//! Every patient operation goes through [`TenantGuard`], which binds it to the
//! hospital of the authenticated request:
//!
//! - reads are filtered by the request's hospital, and a record owned by
//!   another hospital is reported as `NotFound`
//! - creates reject an explicitly declared foreign hospital with `Forbidden`
//!   and otherwise stamp the request's hospital onto the record

use std::sync::Arc;

use carehub_storage::{HospitalId, NewPatient, Patient, PatientQuery, PatientStorage};

use crate::AuthResult;
use crate::error::AuthError;
use crate::middleware::TenantContext;

/// Applies the tenant read and write rules in front of a patient store.
#[derive(Clone)]
pub struct TenantGuard {
    patients: Arc<dyn PatientStorage>,
}

impl TenantGuard {
    /// Creates a guard over `patients`.
    #[must_use]
    pub fn new(patients: Arc<dyn PatientStorage>) -> Self {
        Self { patients }
    }

    /// Checks a write that may declare a target hospital.
    ///
    /// A blank declaration counts as no declaration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if `declared` names a hospital other
    /// than the request's.
    pub fn authorize_write(ctx: &TenantContext, declared: Option<&HospitalId>) -> AuthResult<()> {
        match declared {
            Some(target) if !target.is_blank() && target != &ctx.hospital_id => {
                tracing::warn!(
                    username = %ctx.username,
                    hospital_id = %ctx.hospital_id,
                    target_hospital_id = %target,
                    "Cross-hospital write rejected"
                );
                Err(AuthError::forbidden(
                    "cannot write records for another hospital",
                ))
            }
            _ => Ok(()),
        }
    }

    /// Reads one patient of the request's hospital.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` when the record does not exist or belongs
    /// to another hospital, and `AuthError::Storage` on backend failure.
    pub async fn read_patient(&self, ctx: &TenantContext, id: &str) -> AuthResult<Patient> {
        let scope = ctx.scope();
        match self.patients.find_patient(&scope, id).await? {
            Some(patient) if scope.owns(&patient.hospital_id) => Ok(patient),
            Some(patient) => {
                tracing::warn!(
                    hospital_id = %ctx.hospital_id,
                    owner_hospital_id = %patient.hospital_id,
                    backend = self.patients.backend_name(),
                    "Storage returned a record outside the request scope"
                );
                Err(AuthError::not_found("Patient", id))
            }
            None => Err(AuthError::not_found("Patient", id)),
        }
    }

    /// Searches patients of the request's hospital.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` on backend failure.
    pub async fn search_patients(
        &self,
        ctx: &TenantContext,
        query: &PatientQuery,
    ) -> AuthResult<Vec<Patient>> {
        let scope = ctx.scope();
        let mut found = self.patients.search_patients(&scope, query).await?;
        found.retain(|patient| scope.owns(&patient.hospital_id));
        Ok(found)
    }

    /// Creates a patient owned by the request's hospital.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the payload declares another hospital,
    /// `AuthError::InvalidRequest` if `patient_hn` is blank, and
    /// `AuthError::Conflict` if the hospital already has a patient with the
    /// requested ID. Nothing is persisted on error.
    pub async fn create_patient(
        &self,
        ctx: &TenantContext,
        new_patient: NewPatient,
    ) -> AuthResult<Patient> {
        Self::authorize_write(ctx, new_patient.hospital_id.as_ref())?;

        if new_patient.patient_hn.trim().is_empty() {
            return Err(AuthError::invalid_request("patient_hn is required"));
        }

        let patient = new_patient.into_patient(ctx.hospital_id.clone());
        let stored = self.patients.insert_patient(&ctx.scope(), patient).await?;

        tracing::info!(
            username = %ctx.username,
            hospital_id = %stored.hospital_id,
            patient_id = %stored.id,
            "Patient created"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use carehub_storage::{Demographics, InMemoryStorage, StorageError, TenantScope};

    use super::*;

    fn ctx(hospital: &str) -> TenantContext {
        TenantContext {
            username: "admin01".to_string(),
            hospital_id: HospitalId::new(hospital),
            expires_at: i64::MAX,
        }
    }

    fn new_patient(id: &str, declared: Option<&str>) -> NewPatient {
        NewPatient {
            id: Some(id.to_string()),
            patient_hn: format!("HN-{id}"),
            hospital_id: declared.map(HospitalId::new),
            demographics: Demographics {
                first_name_en: "Somchai".to_string(),
                ..Default::default()
            },
        }
    }

    /// Backend that ignores the scope and counts calls.
    #[derive(Default)]
    struct LeakyStorage {
        calls: AtomicUsize,
        records: Vec<Patient>,
    }

    #[async_trait]
    impl PatientStorage for LeakyStorage {
        async fn find_patient(
            &self,
            _scope: &TenantScope,
            id: &str,
        ) -> Result<Option<Patient>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.iter().find(|p| p.id == id).cloned())
        }

        async fn search_patients(
            &self,
            _scope: &TenantScope,
            _query: &PatientQuery,
        ) -> Result<Vec<Patient>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }

        async fn insert_patient(
            &self,
            _scope: &TenantScope,
            patient: Patient,
        ) -> Result<Patient, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(patient)
        }

        fn backend_name(&self) -> &'static str {
            "leaky"
        }
    }

    #[tokio::test]
    async fn test_cross_tenant_read_is_not_found() {
        let storage = Arc::new(InMemoryStorage::new());
        let guard = TenantGuard::new(storage.clone());
        guard
            .create_patient(&ctx("2"), new_patient("001", None))
            .await
            .unwrap();

        let err = guard.read_patient(&ctx("1"), "001").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound { .. }));

        let own = guard.read_patient(&ctx("2"), "001").await.unwrap();
        assert_eq!(own.hospital_id, HospitalId::new("2"));
    }

    #[tokio::test]
    async fn test_read_rechecks_backend_results() {
        let other = new_patient("007", None).into_patient(HospitalId::new("2"));
        let storage = Arc::new(LeakyStorage {
            records: vec![other],
            ..Default::default()
        });
        let guard = TenantGuard::new(storage);

        let err = guard.read_patient(&ctx("1"), "007").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound { .. }));

        let found = guard
            .search_patients(&ctx("1"), &PatientQuery::default())
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_declared_hospital_is_forbidden_and_not_persisted() {
        let storage = Arc::new(LeakyStorage::default());
        let guard = TenantGuard::new(storage.clone());

        let err = guard
            .create_patient(&ctx("1"), new_patient("001", Some("2")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden { .. }));
        assert_eq!(storage.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_stamps_request_hospital() {
        let storage = Arc::new(InMemoryStorage::new());
        let guard = TenantGuard::new(storage.clone());

        let created = guard
            .create_patient(&ctx("1"), new_patient("001", Some("1")))
            .await
            .unwrap();
        assert_eq!(created.hospital_id, HospitalId::new("1"));

        let created = guard
            .create_patient(&ctx("1"), new_patient("002", Some("")))
            .await
            .unwrap();
        assert_eq!(created.hospital_id, HospitalId::new("1"));
    }

    #[tokio::test]
    async fn test_create_requires_hn() {
        let guard = TenantGuard::new(Arc::new(InMemoryStorage::new()));
        let mut payload = new_patient("001", None);
        payload.patient_hn = " ".to_string();

        let err = guard.create_patient(&ctx("1"), payload).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts_within_hospital_only() {
        let guard = TenantGuard::new(Arc::new(InMemoryStorage::new()));
        guard
            .create_patient(&ctx("1"), new_patient("001", None))
            .await
            .unwrap();

        let err = guard
            .create_patient(&ctx("1"), new_patient("001", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict { .. }));

        guard
            .create_patient(&ctx("2"), new_patient("001", None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_applies_tenant_and_caller_filters() {
        let guard = TenantGuard::new(Arc::new(InMemoryStorage::new()));
        guard
            .create_patient(&ctx("1"), new_patient("001", None))
            .await
            .unwrap();
        guard
            .create_patient(&ctx("2"), new_patient("002", None))
            .await
            .unwrap();

        let query = PatientQuery {
            first_name: Some("somchai".to_string()),
            ..Default::default()
        };
        let found = guard.search_patients(&ctx("1"), &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "001");
    }
}
