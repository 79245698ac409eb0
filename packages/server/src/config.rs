use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{S3Config, StorageAppConfig, StorageBackend};

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Import operation limits.
#[derive(Debug, Deserialize, Clone)]
pub struct ImportsConfig {
    /// Largest accepted `Content-Length` for a single upload. Default: 100 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    /// Lifetime of an operation from creation. Default: 24.
    #[serde(default = "default_operation_ttl_hours")]
    pub operation_ttl_hours: i64,
}

fn default_max_upload_size() -> u64 {
    100 * 1024 * 1024
}
fn default_operation_ttl_hours() -> i64 {
    24
}

/// Longest accepted `operation_ttl_hours` (one year).
pub const MAX_OPERATION_TTL_HOURS: i64 = 24 * 365;

impl ImportsConfig {
    /// Reject limits that would make every create or upload fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_OPERATION_TTL_HOURS).contains(&self.operation_ttl_hours) {
            return Err(ConfigError::Message(format!(
                "imports.operation_ttl_hours must be between 1 and {MAX_OPERATION_TTL_HOURS}, got {}",
                self.operation_ttl_hours
            )));
        }
        if self.max_upload_size == 0 {
            return Err(ConfigError::Message(
                "imports.max_upload_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn operation_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.operation_ttl_hours)
    }
}

impl Default for ImportsConfig {
    fn default() -> Self {
        Self {
            max_upload_size: default_max_upload_size(),
            operation_ttl_hours: default_operation_ttl_hours(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageAppConfig,
    #[serde(default)]
    pub imports: ImportsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("IMPORTS_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., IMPORTS__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("IMPORTS").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.imports.validate()?;
        Ok(config)
    }
}
