//! Integration tests for tenant isolation over HTTP.
//!
//! Two hospitals share one deployment. Staff of each hospital log in and
//! exercise the patient endpoints; nothing of one hospital may be visible to
//! the other.

use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::{TestResponse, TestServer};
use carehub_server::config::{HospitalConfig, StaffAccountConfig};
use carehub_server::{AppConfig, AppState, bootstrap, build_app};
use serde_json::{Value, json};

const AUTHORIZATION: HeaderName = header::AUTHORIZATION;

fn staff(username: &str, hospital_id: &str) -> StaffAccountConfig {
    StaffAccountConfig {
        username: username.into(),
        password: "password123".into(),
        hospital_id: hospital_id.into(),
        full_name: String::new(),
        role: None,
    }
}

/// Creates a seeded server with `admin01` in hospital 1 and `admin02` in hospital 2.
async fn create_test_server(secret: &str) -> TestServer {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = secret.into();
    cfg.bootstrap.seed_demo_data = true;
    cfg.bootstrap.staff = vec![staff("admin01", "1"), staff("admin02", "2")];

    let state = AppState::in_memory(&cfg).expect("Failed to build state");
    bootstrap::run(&state, &cfg.bootstrap)
        .await
        .expect("Failed to seed");
    TestServer::new(build_app(state, &cfg)).expect("Failed to create test server")
}

async fn login(server: &TestServer, username: &str, hospital_id: &str) -> String {
    let response = server
        .post("/staff/login")
        .json(&json!({
            "username": username,
            "password": "password123",
            "hospital_id": hospital_id,
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["token"].as_str().expect("token in body").to_string()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header")
}

async fn get_as(server: &TestServer, path: &str, token: &str) -> TestResponse {
    server.get(path).add_header(AUTHORIZATION, bearer(token)).await
}

async fn create_as(server: &TestServer, token: &str, body: Value) -> TestResponse {
    server
        .post("/patient/add")
        .add_header(AUTHORIZATION, bearer(token))
        .json(&body)
        .await
}

// =============================================================================
// Public surface
// =============================================================================

#[tokio::test]
async fn test_healthz_is_public() {
    let server = create_test_server("integration-secret").await;

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_json(&json!({"status": "ok"}));
}

#[tokio::test]
async fn test_login_with_wrong_hospital_is_rejected() {
    let server = create_test_server("integration-secret").await;

    let response = server
        .post("/staff/login")
        .json(&json!({
            "username": "admin01",
            "password": "password123",
            "hospital_id": "2",
        }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let server = create_test_server("integration-secret").await;
    server.get("/nowhere").await.assert_status_not_found();
}

// =============================================================================
// Token gate
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let server = create_test_server("integration-secret").await;

    for path in ["/patient/search", "/patient/search/001"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    get_as(&server, "/patient/search", "not-a-token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_deployment_is_rejected() {
    let server = create_test_server("integration-secret").await;
    let other = create_test_server("another-secret").await;

    let foreign_token = login(&other, "admin01", "1").await;
    get_as(&server, "/patient/search/001", &foreign_token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_own_hospital_reads_patient() {
    let server = create_test_server("integration-secret").await;
    let token = login(&server, "admin01", "1").await;

    let response = get_as(&server, "/patient/search/001", &token).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["patient_hn"], "HN123456");
    assert_eq!(body["hospital_id"], "1");
}

#[tokio::test]
async fn test_other_hospital_gets_not_found() {
    let server = create_test_server("integration-secret").await;
    let token = login(&server, "admin02", "2").await;

    get_as(&server, "/patient/search/001", &token)
        .await
        .assert_status_not_found();

    let response = get_as(&server, "/patient/search?first_name=somchai", &token).await;
    response.assert_status_ok();
    response.assert_json(&json!([]));
}

#[tokio::test]
async fn test_search_combines_filters() {
    let server = create_test_server("integration-secret").await;
    let token = login(&server, "admin01", "1").await;

    let response = get_as(
        &server,
        "/patient/search?first_name=SOM&date_of_birth=1990-01-01",
        &token,
    )
    .await;
    response.assert_status_ok();
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);

    get_as(
        &server,
        "/patient/search?first_name=som&national_id=0000000000000",
        &token,
    )
    .await
    .assert_json(&json!([]));

    get_as(&server, "/patient/search?date_of_birth=yesterday", &token)
        .await
        .assert_status_bad_request();
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_cross_hospital_create_is_forbidden_and_not_persisted() {
    let server = create_test_server("integration-secret").await;
    let token = login(&server, "admin01", "1").await;

    create_as(
        &server,
        &token,
        json!({"id": "900", "patient_hn": "HN900", "hospital_id": "2"}),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let other = login(&server, "admin02", "2").await;
    get_as(&server, "/patient/search/900", &other)
        .await
        .assert_status_not_found();
    get_as(&server, "/patient/search/900", &token)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_create_without_hospital_uses_claim() {
    let server = create_test_server("integration-secret").await;
    let token = login(&server, "admin02", "2").await;

    let response = create_as(
        &server,
        &token,
        json!({"patient_hn": "HN777", "first_name_en": "Malee", "date_of_birth": "1985-06-15"}),
    )
    .await;
    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["patient_hn"], "HN777");
    let id = created["patient_id"].as_str().expect("patient_id").to_string();

    let response = get_as(&server, &format!("/patient/search/{id}"), &token).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["hospital_id"], "2");

    let admin01 = login(&server, "admin01", "1").await;
    get_as(&server, &format!("/patient/search/{id}"), &admin01)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_same_patient_id_in_two_hospitals() {
    let server = create_test_server("integration-secret").await;
    let token = login(&server, "admin02", "2").await;

    // "001" already exists in hospital 1
    create_as(&server, &token, json!({"id": "001", "patient_hn": "HN-B-001"}))
        .await
        .assert_status(StatusCode::CREATED);

    create_as(&server, &token, json!({"id": "001", "patient_hn": "HN-B-002"}))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_staff_provisioning_is_tenant_bound() {
    let server = create_test_server("integration-secret").await;
    let token = login(&server, "admin01", "1").await;

    server
        .post("/staff/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"username": "nurse02", "password": "pw", "hospital_id": "2"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .post("/staff/add")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"username": "nurse01", "password": "pw", "hospital_id": "1"}))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/staff/login")
        .json(&json!({"username": "nurse01", "password": "pw", "hospital_id": "1"}))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_configured_hospital_supports_login_without_demo_data() {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = "integration-secret".into();
    cfg.bootstrap.hospitals = vec![HospitalConfig {
        id: "7".into(),
        name: "Chiang Mai Clinic".into(),
        address: "Chiang Mai, Thailand".into(),
    }];
    cfg.bootstrap.staff = vec![staff("doctor07", "7")];

    let state = AppState::in_memory(&cfg).expect("Failed to build state");
    bootstrap::run(&state, &cfg.bootstrap)
        .await
        .expect("Failed to seed");
    let server = TestServer::new(build_app(state, &cfg)).expect("Failed to create test server");

    let token = login(&server, "doctor07", "7").await;
    create_as(&server, &token, json!({"id": "A1", "patient_hn": "HN-A1"}))
        .await
        .assert_status(StatusCode::CREATED);
    get_as(&server, "/patient/search/A1", &token)
        .await
        .assert_status_ok();
}
