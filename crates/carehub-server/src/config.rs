use carehub_auth::config::AuthConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Token signing and verification
    #[serde(default)]
    pub auth: AuthConfig,
    /// Startup seeding (hospitals, demo patient, staff accounts)
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        self.auth
            .validate()
            .map_err(|e| format!("auth config error: {e}"))?;
        for hospital in &self.bootstrap.hospitals {
            if hospital.id.trim().is_empty() || hospital.name.trim().is_empty() {
                return Err("bootstrap.hospitals entries need an id and name".into());
            }
        }
        for staff in &self.bootstrap.staff {
            if staff.username.trim().is_empty() || staff.hospital_id.trim().is_empty() {
                return Err("bootstrap.staff entries need a username and hospital_id".into());
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Data created at startup if missing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BootstrapConfig {
    /// Seed the two demo hospitals and one demo patient.
    #[serde(default)]
    pub seed_demo_data: bool,

    /// Hospitals to register on startup (skipped if the id exists).
    #[serde(default)]
    pub hospitals: Vec<HospitalConfig>,

    /// Staff accounts to provision on startup (skipped if the username exists).
    #[serde(default)]
    pub staff: Vec<StaffAccountConfig>,
}

/// A hospital registered during bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// A staff account created during bootstrap.
#[derive(Clone, Serialize, Deserialize)]
pub struct StaffAccountConfig {
    pub username: String,
    pub password: String,
    pub hospital_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl fmt::Debug for StaffAccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaffAccountConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("hospital_id", &self.hospital_id)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish()
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Default configuration file, relative to the working directory.
    pub const DEFAULT_CONFIG_PATH: &str = "carehub.toml";

    /// Legacy variable holding the signing secret.
    pub const LEGACY_SECRET_VAR: &str = "JWT_SECRET";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., CAREHUB__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("CAREHUB")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let mut merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;

        if merged.auth.jwt_secret.is_empty()
            && let Ok(secret) = std::env::var(LEGACY_SECRET_VAR)
        {
            merged.auth.jwt_secret = secret;
        }

        merged.validate()?;
        Ok(merged)
    }
}
