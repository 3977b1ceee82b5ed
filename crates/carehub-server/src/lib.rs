pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod observability;
pub mod patient;
pub mod server;

pub use config::{
    AppConfig, BootstrapConfig, HospitalConfig, LoggingConfig, ServerConfig, StaffAccountConfig,
};
pub use observability::init_tracing;
pub use server::{AppState, CarehubServer, ServerBuilder, build_app};
