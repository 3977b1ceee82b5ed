//! Startup seeding.
//!
//! Creates the demo hospitals and patient, the configured hospitals and the
//! configured staff accounts. Every step skips records that already exist,
//! so running it twice is harmless.

use carehub_auth::{AuthError, AuthResult, Credential};
use carehub_storage::{
    Demographics, Hospital, HospitalId, NewPatient, TenantScope, parse_date,
};
use tracing::{info, warn};

use crate::config::BootstrapConfig;
use crate::server::AppState;

/// Hospitals created when demo data is enabled: (id, name, address).
const DEMO_HOSPITALS: &[(&str, &str, &str)] = &[
    ("1", "BKK Hospital", "Bangkok, Thailand"),
    ("2", "Bangna Medical", "Samut Prakan, Thailand"),
];

/// Seeds the store according to `config`.
///
/// # Errors
///
/// Returns an error if the store fails or a configured staff account is
/// invalid (for example, it references an unknown hospital).
pub async fn run(state: &AppState, config: &BootstrapConfig) -> AuthResult<BootstrapStats> {
    let mut stats = BootstrapStats::default();

    if config.seed_demo_data {
        for (id, name, address) in DEMO_HOSPITALS {
            ensure_hospital(state, Hospital::new(*id, *name, *address), &mut stats).await?;
        }
        seed_demo_patient(state, &mut stats).await?;
    }

    // Registered before staff, which must reference an existing hospital.
    for hospital in &config.hospitals {
        let hospital = Hospital::new(
            hospital.id.trim(),
            hospital.name.clone(),
            hospital.address.clone(),
        );
        ensure_hospital(state, hospital, &mut stats).await?;
    }

    for account in &config.staff {
        let mut credential = Credential::new(
            account.username.clone(),
            account.password.clone(),
            account.hospital_id.clone(),
        )
        .with_display_name(account.full_name.clone());
        if let Some(role) = &account.role {
            credential = credential.with_role(role.clone());
        }

        match state.staff.provision(credential).await {
            Ok(created) => {
                info!(
                    username = %created.username,
                    hospital_id = %created.hospital_id,
                    "Bootstrap staff account created"
                );
                stats.staff += 1;
            }
            Err(AuthError::Conflict { .. }) => {
                info!(username = %account.username, "Bootstrap staff account exists, skipping");
            }
            Err(e) => {
                warn!(username = %account.username, error = %e, "Bootstrap staff account rejected");
                return Err(e);
            }
        }
    }

    Ok(stats)
}

async fn ensure_hospital(
    state: &AppState,
    hospital: Hospital,
    stats: &mut BootstrapStats,
) -> AuthResult<()> {
    if state.hospitals.find_hospital(&hospital.id).await?.is_some() {
        return Ok(());
    }
    let created = state.hospitals.insert_hospital(hospital).await?;
    info!(hospital_id = %created.id, name = %created.name, "Hospital seeded");
    stats.hospitals += 1;
    Ok(())
}

async fn seed_demo_patient(state: &AppState, stats: &mut BootstrapStats) -> AuthResult<()> {
    let hospital_id = HospitalId::new("1");
    let scope = TenantScope::new(hospital_id.clone());
    if state.patients.find_patient(&scope, "001").await?.is_some() {
        return Ok(());
    }

    let date_of_birth = parse_date("1990-01-01")
        .map_err(|e| AuthError::internal(format!("demo patient date: {e}")))?;
    let patient = NewPatient {
        id: Some("001".to_string()),
        patient_hn: "HN123456".to_string(),
        hospital_id: None,
        demographics: Demographics {
            first_name_th: "สมชาย".to_string(),
            last_name_th: "รักดี".to_string(),
            first_name_en: "Somchai".to_string(),
            last_name_en: "Rakdee".to_string(),
            date_of_birth: Some(date_of_birth),
            national_id: "1234567890123".to_string(),
            phone_number: "0812345678".to_string(),
            gender: "M".to_string(),
            ..Default::default()
        },
    }
    .into_patient(hospital_id);

    state.patients.insert_patient(&scope, patient).await?;
    info!(hospital_id = "1", patient_id = "001", "Demo patient seeded");
    stats.patients += 1;
    Ok(())
}

/// Statistics about the bootstrap operation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootstrapStats {
    pub hospitals: usize,
    pub patients: usize,
    pub staff: usize,
}

impl BootstrapStats {
    /// Returns the total number of records created.
    pub fn total(&self) -> usize {
        self.hospitals + self.patients + self.staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, HospitalConfig, StaffAccountConfig};

    fn config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.auth.jwt_secret = "secret".into();
        cfg.bootstrap.seed_demo_data = true;
        cfg.bootstrap.staff = vec![StaffAccountConfig {
            username: "admin01".into(),
            password: "password123".into(),
            hospital_id: "1".into(),
            full_name: "Admin One".into(),
            role: Some("admin".into()),
        }];
        cfg
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let cfg = config();
        let state = AppState::in_memory(&cfg).unwrap();

        let first = run(&state, &cfg.bootstrap).await.unwrap();
        assert_eq!(
            first,
            BootstrapStats {
                hospitals: 2,
                patients: 1,
                staff: 1
            }
        );
        assert_eq!(first.total(), 4);

        let second = run(&state, &cfg.bootstrap).await.unwrap();
        assert_eq!(second.total(), 0);
    }

    #[tokio::test]
    async fn test_demo_patient_matches_seed() {
        let cfg = config();
        let state = AppState::in_memory(&cfg).unwrap();
        run(&state, &cfg.bootstrap).await.unwrap();

        let scope = TenantScope::new(HospitalId::new("1"));
        let patient = state
            .patients
            .find_patient(&scope, "001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(patient.patient_hn, "HN123456");
        assert_eq!(patient.demographics.last_name_th, "รักดี");
        assert_eq!(patient.demographics.last_name_en, "Rakdee");
        assert!(patient.demographics.email.is_empty());
    }

    #[tokio::test]
    async fn test_configured_hospitals_allow_staff_without_demo_data() {
        let mut cfg = config();
        cfg.bootstrap.seed_demo_data = false;
        cfg.bootstrap.hospitals = vec![HospitalConfig {
            id: "1".into(),
            name: "BKK Hospital".into(),
            address: "Bangkok, Thailand".into(),
        }];
        let state = AppState::in_memory(&cfg).unwrap();

        let stats = run(&state, &cfg.bootstrap).await.unwrap();
        assert_eq!(
            stats,
            BootstrapStats {
                hospitals: 1,
                patients: 0,
                staff: 1
            }
        );
        assert_eq!(state.hospitals.list_hospitals().await.unwrap().len(), 1);

        let again = run(&state, &cfg.bootstrap).await.unwrap();
        assert_eq!(again.total(), 0);
    }

    #[tokio::test]
    async fn test_staff_for_unknown_hospital_fails() {
        let mut cfg = config();
        cfg.bootstrap.seed_demo_data = false;
        let state = AppState::in_memory(&cfg).unwrap();

        let err = run(&state, &cfg.bootstrap).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }
}
