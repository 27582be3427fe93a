//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `sitehub.toml` in the working directory. Every field has a
//! default so the file is optional, except the admin codes which must be
//! provided by the file or the environment. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use sitehub_adapter_holidays_reqwest::{PUBLIC_HOLIDAYS_URL, SCHOOL_HOLIDAYS_URL};
use sitehub_domain::presence::{DEFAULT_HEARTBEAT_TTL, DEFAULT_SWEEP_INTERVAL};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub admin: AdminConfig,
    pub presence: PresenceConfig,
    pub calendar: CalendarConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Allowed browser origins. Empty or `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Capacity of the live event channel.
    pub event_capacity: usize,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Shared secrets granting admin and super admin privileges.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub code: String,
    pub super_admin_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Seconds after which a heartbeat stops counting.
    pub ttl_secs: u64,
    /// Seconds between two sweeps of expired heartbeats.
    pub sweep_secs: u64,
}

/// Upstream holiday APIs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub public_holidays_url: String,
    pub school_holidays_url: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from `sitehub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("sitehub.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SITEHUB_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("SITEHUB_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("SITEHUB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("SITEHUB_CORS_ORIGINS") {
            self.server.cors_origins = val
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(val) = var("SITEHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("SITEHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("SITEHUB_ADMIN_CODE") {
            self.admin.code = val;
        }
        if let Some(val) = var("SITEHUB_SUPER_ADMIN_CODE") {
            self.admin.super_admin_code = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.server.event_capacity == 0 {
            return Err(ConfigError::Validation(
                "event_capacity must be non-zero".to_string(),
            ));
        }
        if self.admin.code.is_empty() || self.admin.super_admin_code.is_empty() {
            return Err(ConfigError::Validation(
                "admin codes must be set (SITEHUB_ADMIN_CODE, SITEHUB_SUPER_ADMIN_CODE)"
                    .to_string(),
            ));
        }
        if self.admin.code == self.admin.super_admin_code {
            return Err(ConfigError::Validation(
                "admin and super admin codes must differ".to_string(),
            ));
        }
        if self.presence.ttl_secs == 0 || self.presence.sweep_secs == 0 {
            return Err(ConfigError::Validation(
                "presence ttl_secs and sweep_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl PresenceConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_secs)
    }
}

impl CalendarConfig {
    /// Settings for the holiday adapter.
    #[must_use]
    pub fn adapter_config(&self) -> sitehub_adapter_holidays_reqwest::Config {
        sitehub_adapter_holidays_reqwest::Config {
            public_holidays_url: self.public_holidays_url.clone(),
            school_holidays_url: self.school_holidays_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            event_capacity: 256,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:sitehub.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sitehubd=info,sitehub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_HEARTBEAT_TTL.as_secs(),
            sweep_secs: DEFAULT_SWEEP_INTERVAL.as_secs(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            public_holidays_url: PUBLIC_HOLIDAYS_URL.to_string(),
            school_holidays_url: SCHOOL_HOLIDAYS_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
