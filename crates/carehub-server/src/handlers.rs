use axum::{Json, http::StatusCode, response::IntoResponse};
use carehub_auth::AuthError;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn not_found(uri: axum::http::Uri) -> AuthError {
    AuthError::not_found("Route", uri.path())
}
