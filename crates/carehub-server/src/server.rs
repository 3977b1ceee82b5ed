use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use carehub_auth::{
    AuthResult, AuthState, JwtService, MemoryCredentialStore, StaffState, TenantGuard,
    TokenIssuer, TokenVerifier, authentication_middleware, create_staff_handler, login_handler,
};
use carehub_storage::{HospitalStorage, InMemoryStorage, PatientStorage};
use tower_http::trace::TraceLayer;

use crate::{bootstrap, config::AppConfig, handlers, patient};

/// Shared application state.
///
/// The signing key lives inside the verifier and issuer and is fixed for the
/// lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub staff: StaffState,
    pub guard: TenantGuard,
    pub patients: Arc<dyn PatientStorage>,
    pub hospitals: Arc<dyn HospitalStorage>,
}

impl AppState {
    /// Wires every service over a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the auth settings cannot be used.
    pub fn in_memory(cfg: &AppConfig) -> AuthResult<Self> {
        let storage = Arc::new(InMemoryStorage::new());
        let credentials = Arc::new(MemoryCredentialStore::new());
        let jwt_service = Arc::new(JwtService::new(
            cfg.auth.jwt_secret.as_bytes(),
            cfg.auth.issuer.clone(),
        ));

        let issuer = Arc::new(TokenIssuer::from_config(
            jwt_service.clone(),
            credentials.clone(),
            &cfg.auth,
        )?);
        let verifier = Arc::new(TokenVerifier::new(jwt_service, cfg.auth.scheme.clone()));

        Ok(Self {
            auth: AuthState::new(verifier),
            staff: StaffState::new(issuer, credentials, storage.clone(), cfg.auth.scheme.clone()),
            guard: TenantGuard::new(storage.clone()),
            patients: storage.clone(),
            hospitals: storage,
        })
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for StaffState {
    fn from_ref(state: &AppState) -> Self {
        state.staff.clone()
    }
}

impl FromRef<AppState> for TenantGuard {
    fn from_ref(state: &AppState) -> Self {
        state.guard.clone()
    }
}

pub struct CarehubServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;

    // Every route here requires a verified session token.
    let protected = Router::new()
        .route("/staff/add", post(create_staff_handler))
        .route("/patient/search", get(patient::search_patients))
        .route("/patient/search/{id}", get(patient::read_patient))
        .route("/patient/add", post(patient::create_patient))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            authentication_middleware,
        ));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/staff/login", post(login_handler))
        .merge(protected)
        .fallback(handlers::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri().path(),
                        http.status_code = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[derive(Default)]
pub struct ServerBuilder {
    config: AppConfig,
    addr: Option<SocketAddr>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<CarehubServer> {
        let state = AppState::in_memory(&self.config)?;
        let stats = bootstrap::run(&state, &self.config.bootstrap).await?;
        tracing::info!(
            hospitals = stats.hospitals,
            patients = stats.patients,
            staff = stats.staff,
            backend = state.patients.backend_name(),
            "Bootstrap completed"
        );

        let app = build_app(state, &self.config);
        Ok(CarehubServer {
            addr: self.addr.unwrap_or_else(|| self.config.addr()),
            app,
        })
    }
}

impl CarehubServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
