//! Record types shared by storage backends and their callers.
//!
//! Every tenant-bound record carries a [`HospitalId`]. Reads and writes of
//! those records go through a [`TenantScope`], so a backend never sees a
//! query that is not pinned to exactly one hospital.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

time::serde::format_description!(date_format, Date, "[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns the parse error if the input is not a valid date in that format.
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(
        value,
        time::macros::format_description!("[year]-[month]-[day]"),
    )
}

// =============================================================================
// Hospital identity
// =============================================================================

/// Identifier of a hospital, the unit of data isolation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HospitalId(String);

impl HospitalId {
    /// Creates a hospital identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is empty or only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HospitalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HospitalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The hospital a storage call is confined to.
///
/// Tenant-bound storage methods take a scope instead of a bare identifier so
/// that an unscoped query cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantScope {
    hospital_id: HospitalId,
}

impl TenantScope {
    /// Creates a scope for the given hospital.
    #[must_use]
    pub fn new(hospital_id: HospitalId) -> Self {
        Self { hospital_id }
    }

    /// Returns the hospital this scope is confined to.
    #[must_use]
    pub fn hospital_id(&self) -> &HospitalId {
        &self.hospital_id
    }

    /// Returns `true` if a record owned by `hospital_id` is visible in this scope.
    #[must_use]
    pub fn owns(&self, hospital_id: &HospitalId) -> bool {
        &self.hospital_id == hospital_id
    }
}

// =============================================================================
// Hospital
// =============================================================================

/// A registered hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    /// Hospital identifier, referenced by staff and patient records.
    pub id: HospitalId,

    /// Display name.
    pub name: String,

    /// Postal address.
    #[serde(default)]
    pub address: String,

    /// When the hospital was registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Hospital {
    /// Creates a hospital record stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<HospitalId>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

// =============================================================================
// Patient
// =============================================================================

/// Demographic fields of a patient record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(default)]
    pub first_name_th: String,
    #[serde(default)]
    pub middle_name_th: String,
    #[serde(default)]
    pub last_name_th: String,
    #[serde(default)]
    pub first_name_en: String,
    #[serde(default)]
    pub middle_name_en: String,
    #[serde(default)]
    pub last_name_en: String,

    /// Date of birth, serialized as `YYYY-MM-DD`.
    #[serde(default, with = "date_format::option")]
    pub date_of_birth: Option<Date>,

    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub passport_id: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,

    /// Single-letter gender code.
    #[serde(default)]
    pub gender: String,
}

/// A stored patient record.
///
/// `hospital_id` is set once at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Record identifier, unique within its hospital.
    pub id: String,

    /// Hospital number assigned by the owning hospital.
    pub patient_hn: String,

    /// Owning hospital.
    pub hospital_id: HospitalId,

    #[serde(flatten)]
    pub demographics: Demographics,
}

/// A patient record as submitted for creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    /// Requested identifier; generated when absent.
    #[serde(default)]
    pub id: Option<String>,

    pub patient_hn: String,

    /// Target hospital declared by the caller, if any.
    #[serde(default)]
    pub hospital_id: Option<HospitalId>,

    #[serde(flatten)]
    pub demographics: Demographics,
}

impl NewPatient {
    /// Builds the stored record, owned by `hospital_id`.
    ///
    /// Any declared target hospital is discarded; callers check it beforehand.
    #[must_use]
    pub fn into_patient(self, hospital_id: HospitalId) -> Patient {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Patient {
            id,
            patient_hn: self.patient_hn,
            hospital_id,
            demographics: self.demographics,
        }
    }
}

// =============================================================================
// Patient query
// =============================================================================

/// Caller-supplied patient filters.
///
/// All present filters must match. The tenant filter is not part of this
/// type; it comes from the [`TenantScope`] passed alongside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientQuery {
    /// Exact national ID.
    pub national_id: Option<String>,
    /// Exact passport ID.
    pub passport_id: Option<String>,
    /// Case-insensitive substring of the Thai or English first name.
    pub first_name: Option<String>,
    /// Exact Thai or English middle name.
    pub middle_name: Option<String>,
    /// Case-insensitive substring of the Thai or English last name.
    pub last_name: Option<String>,
    /// Exact date of birth.
    pub date_of_birth: Option<Date>,
    /// Exact email address.
    pub email: Option<String>,
}

impl PatientQuery {
    /// Returns `true` if no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Checks whether a patient satisfies every filter in this query.
    #[must_use]
    pub fn matches(&self, patient: &Patient) -> bool {
        let d = &patient.demographics;

        if let Some(v) = &self.national_id
            && d.national_id != *v
        {
            return false;
        }
        if let Some(v) = &self.passport_id
            && d.passport_id != *v
        {
            return false;
        }
        if let Some(v) = &self.first_name
            && !contains_ci(&d.first_name_th, v)
            && !contains_ci(&d.first_name_en, v)
        {
            return false;
        }
        if let Some(v) = &self.middle_name
            && d.middle_name_th != *v
            && d.middle_name_en != *v
        {
            return false;
        }
        if let Some(v) = &self.last_name
            && !contains_ci(&d.last_name_th, v)
            && !contains_ci(&d.last_name_en, v)
        {
            return false;
        }
        if let Some(v) = &self.date_of_birth
            && d.date_of_birth.as_ref() != Some(v)
        {
            return false;
        }
        if let Some(v) = &self.email
            && d.email != *v
        {
            return false;
        }
        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn somchai() -> Patient {
        Patient {
            id: "001".to_string(),
            patient_hn: "HN123456".to_string(),
            hospital_id: HospitalId::new("1"),
            demographics: Demographics {
                first_name_th: "สมชาย".to_string(),
                last_name_th: "รักดี".to_string(),
                first_name_en: "Somchai".to_string(),
                last_name_en: "Rakdee".to_string(),
                date_of_birth: Some(Date::from_calendar_date(1990, Month::January, 1).unwrap()),
                national_id: "1234567890123".to_string(),
                phone_number: "0812345678".to_string(),
                gender: "M".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = PatientQuery::default();
        assert!(query.is_empty());
        assert!(query.matches(&somchai()));
    }

    #[test]
    fn test_name_filters_are_substring_and_case_insensitive() {
        let query = PatientQuery {
            first_name: Some("somch".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&somchai()));

        let query = PatientQuery {
            last_name: Some("รัก".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&somchai()));

        let query = PatientQuery {
            last_name: Some("Smith".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&somchai()));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let query = PatientQuery {
            national_id: Some("1234567890123".to_string()),
            email: Some("nobody@example.com".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&somchai()));
    }

    #[test]
    fn test_date_of_birth_filter() {
        let query = PatientQuery {
            date_of_birth: Some(parse_date("1990-01-01").unwrap()),
            ..Default::default()
        };
        assert!(query.matches(&somchai()));

        let query = PatientQuery {
            date_of_birth: Some(parse_date("1991-01-01").unwrap()),
            ..Default::default()
        };
        assert!(!query.matches(&somchai()));
    }

    #[test]
    fn test_patient_json_shape() {
        let json = serde_json::to_value(somchai()).unwrap();
        assert_eq!(json["hospital_id"], "1");
        assert_eq!(json["date_of_birth"], "1990-01-01");
        assert_eq!(json["first_name_en"], "Somchai");
    }

    #[test]
    fn test_new_patient_generates_id_when_absent() {
        let new = NewPatient {
            patient_hn: "HN1".to_string(),
            hospital_id: Some(HospitalId::new("2")),
            ..Default::default()
        };
        let patient = new.into_patient(HospitalId::new("1"));
        assert!(!patient.id.is_empty());
        assert_eq!(patient.hospital_id, HospitalId::new("1"));
    }

    #[test]
    fn test_tenant_scope_owns() {
        let scope = TenantScope::new(HospitalId::new("1"));
        assert!(scope.owns(&HospitalId::new("1")));
        assert!(!scope.owns(&HospitalId::new("2")));
    }
}
