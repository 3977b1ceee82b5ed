//! Patient endpoints.
//!
//! Each handler takes the request's [`TenantContext`] and goes through the
//! [`TenantGuard`]; none of them touch the store directly.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use carehub_auth::{AuthError, TenantContext, TenantGuard};
use carehub_storage::{NewPatient, Patient, PatientQuery, parse_date};
use serde::{Deserialize, Serialize};

/// Query string of `GET /patient/search`.
///
/// Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PatientSearchParams {
    pub national_id: Option<String>,
    pub passport_id: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<PatientSearchParams> for PatientQuery {
    type Error = AuthError;

    fn try_from(params: PatientSearchParams) -> Result<Self, Self::Error> {
        let date_of_birth = match non_blank(params.date_of_birth) {
            Some(raw) => Some(parse_date(&raw).map_err(|_| {
                AuthError::invalid_request(format!(
                    "date_of_birth must be YYYY-MM-DD, got '{raw}'"
                ))
            })?),
            None => None,
        };

        Ok(PatientQuery {
            national_id: non_blank(params.national_id),
            passport_id: non_blank(params.passport_id),
            first_name: non_blank(params.first_name),
            middle_name: non_blank(params.middle_name),
            last_name: non_blank(params.last_name),
            date_of_birth,
            email: non_blank(params.email),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct CreatePatientResponse {
    pub message: String,
    pub patient_id: String,
    pub patient_hn: String,
}

/// `GET /patient/search`
pub async fn search_patients(
    State(guard): State<TenantGuard>,
    ctx: TenantContext,
    Query(params): Query<PatientSearchParams>,
) -> Result<Json<Vec<Patient>>, AuthError> {
    let query = PatientQuery::try_from(params)?;
    let patients = guard.search_patients(&ctx, &query).await?;
    tracing::debug!(
        hospital_id = %ctx.hospital_id,
        results = patients.len(),
        "Patient search"
    );
    Ok(Json(patients))
}

/// `GET /patient/search/{id}`
pub async fn read_patient(
    State(guard): State<TenantGuard>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> Result<Json<Patient>, AuthError> {
    guard.read_patient(&ctx, &id).await.map(Json)
}

/// `POST /patient/add`
pub async fn create_patient(
    State(guard): State<TenantGuard>,
    ctx: TenantContext,
    Json(payload): Json<NewPatient>,
) -> Result<impl IntoResponse, AuthError> {
    let patient = guard.create_patient(&ctx, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePatientResponse {
            message: "Patient created successfully".to_string(),
            patient_id: patient.id,
            patient_hn: patient.patient_hn,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_to_query() {
        let params = PatientSearchParams {
            first_name: Some(" Som ".into()),
            email: Some("".into()),
            date_of_birth: Some("1990-01-01".into()),
            ..Default::default()
        };
        let query = PatientQuery::try_from(params).unwrap();
        assert_eq!(query.first_name.as_deref(), Some("Som"));
        assert!(query.email.is_none());
        assert_eq!(query.date_of_birth, Some(parse_date("1990-01-01").unwrap()));
    }

    #[test]
    fn test_bad_date_is_invalid_request() {
        let params = PatientSearchParams {
            date_of_birth: Some("01/01/1990".into()),
            ..Default::default()
        };
        let err = PatientQuery::try_from(params).unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }
}
