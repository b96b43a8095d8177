use std::env;
use std::time::Duration;

use auth::TokenLifetimes;
use config::builder::ConfigBuilder;
use config::builder::DefaultState;
use config::Config as Settings;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Which record store backs the service.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiration_hours: i64,
    pub refresh_expiration_days: i64,
}

impl JwtConfig {
    pub const MIN_SECRET_LENGTH: usize = 32;

    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            access: chrono::Duration::hours(self.access_expiration_hours),
            refresh: chrono::Duration::days(self.refresh_expiration_days),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Exact number of characters every ISBN must have
    pub isbn_length: usize,
}

impl CatalogConfig {
    /// Width of the `books.isbn` column.
    pub const MAX_ISBN_LENGTH: usize = 32;
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let files = Settings::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        Self::layered(files, Environment::default())
    }

    /// Put `environment` on top of the file sources, then deserialize and
    /// validate.
    fn layered(
        files: ConfigBuilder<DefaultState>,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        // Example: JWT__SECRET=... overrides jwt.secret
        let config: Config = files
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < JwtConfig::MIN_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                JwtConfig::MIN_SECRET_LENGTH
            )));
        }
        if self.jwt.access_expiration_hours <= 0 || self.jwt.refresh_expiration_days <= 0 {
            return Err(ConfigError::Message(
                "token lifetimes must be positive".to_string(),
            ));
        }
        if self.catalog.isbn_length == 0
            || self.catalog.isbn_length > CatalogConfig::MAX_ISBN_LENGTH
        {
            return Err(ConfigError::Message(format!(
                "catalog.isbn_length must be between 1 and {}",
                CatalogConfig::MAX_ISBN_LENGTH
            )));
        }
        Ok(())
    }
}
