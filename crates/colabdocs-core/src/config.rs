//! Configuration module
//!
//! Configuration is read from the environment (optionally seeded from a
//! `.env` file) into `ImporterConfig`, wrapped by the `Config` newtype that
//! the rest of the workspace uses through getters.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const STORAGE_TIMEOUT_SECS: u64 = 60;
const MAX_ARCHIVE_SIZE_MB: usize = 200;
const MAX_ARCHIVE_ENTRIES: usize = 10_000;
const MAX_ENTRY_SIZE_MB: u64 = 100;
const MAX_TOTAL_UNCOMPRESSED_MB: u64 = 512;
const PLACEHOLDER_EMAIL_DOMAIN: &str = "importado.local";

/// Server and database settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Settings for the collaborator import service
#[derive(Clone, Debug)]
pub struct ImporterConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub storage_api_url: Option<String>,
    pub storage_api_token: Option<String>,
    /// PEM file with an extra root certificate for the storage API (internal CA).
    pub storage_ca_cert_path: Option<String>,
    pub storage_timeout_secs: u64,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Archive limits
    pub max_archive_size_bytes: usize,
    pub max_archive_entries: usize,
    pub max_entry_size_bytes: u64,
    pub max_total_uncompressed_bytes: u64,
    // Placeholder data for fields the archive does not carry
    pub placeholder_email_domain: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ImporterConfig>);

impl Config {
    fn as_importer(&self) -> &ImporterConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_importer().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ImporterConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_importer().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_importer().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_importer().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_importer().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_importer().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_importer().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.as_importer().database_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_importer().storage_backend
    }

    pub fn storage_api_url(&self) -> Option<&str> {
        self.as_importer().storage_api_url.as_deref()
    }

    pub fn storage_api_token(&self) -> Option<&str> {
        self.as_importer().storage_api_token.as_deref()
    }

    pub fn storage_ca_cert_path(&self) -> Option<&str> {
        self.as_importer().storage_ca_cert_path.as_deref()
    }

    pub fn storage_timeout_secs(&self) -> u64 {
        self.as_importer().storage_timeout_secs
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_importer().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_importer().local_storage_base_url.as_deref()
    }

    pub fn max_archive_size_bytes(&self) -> usize {
        self.as_importer().max_archive_size_bytes
    }

    pub fn max_archive_entries(&self) -> usize {
        self.as_importer().max_archive_entries
    }

    pub fn max_entry_size_bytes(&self) -> u64 {
        self.as_importer().max_entry_size_bytes
    }

    pub fn max_total_uncompressed_bytes(&self) -> u64 {
        self.as_importer().max_total_uncompressed_bytes
    }

    pub fn placeholder_email_domain(&self) -> &str {
        &self.as_importer().placeholder_email_domain
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ImporterConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Http,
        };

        let mib = 1024 * 1024;

        Ok(ImporterConfig {
            base,
            database_url,
            storage_backend,
            storage_api_url: env_opt("STORAGE_API_URL"),
            storage_api_token: env_opt("STORAGE_API_TOKEN"),
            storage_ca_cert_path: env_opt("STORAGE_CA_CERT_PATH"),
            storage_timeout_secs: env_or("STORAGE_TIMEOUT_SECS", STORAGE_TIMEOUT_SECS),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            max_archive_size_bytes: env_or("MAX_ARCHIVE_SIZE_MB", MAX_ARCHIVE_SIZE_MB) * mib,
            max_archive_entries: env_or("MAX_ARCHIVE_ENTRIES", MAX_ARCHIVE_ENTRIES),
            max_entry_size_bytes: env_or("MAX_ENTRY_SIZE_MB", MAX_ENTRY_SIZE_MB) * mib as u64,
            max_total_uncompressed_bytes: env_or(
                "MAX_TOTAL_UNCOMPRESSED_MB",
                MAX_TOTAL_UNCOMPRESSED_MB,
            ) * mib as u64,
            placeholder_email_domain: env_opt("PLACEHOLDER_EMAIL_DOMAIN")
                .unwrap_or_else(|| PLACEHOLDER_EMAIL_DOMAIN.to_string()),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        match self.storage_backend {
            StorageBackend::Http => {
                let url = self.storage_api_url.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("STORAGE_API_URL must be set when STORAGE_BACKEND=http")
                })?;
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    return Err(anyhow::anyhow!(
                        "STORAGE_API_URL must start with http:// or https://"
                    ));
                }
                if is_production_name(&self.base.environment) && url.starts_with("http://") {
                    return Err(anyhow::anyhow!(
                        "STORAGE_API_URL must use https:// in production"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL"
                    ));
                }
            }
        }

        if self.max_archive_size_bytes == 0 || self.max_archive_entries == 0 {
            return Err(anyhow::anyhow!(
                "MAX_ARCHIVE_SIZE_MB and MAX_ARCHIVE_ENTRIES must be greater than zero"
            ));
        }

        if self.max_entry_size_bytes > self.max_total_uncompressed_bytes {
            return Err(anyhow::anyhow!(
                "MAX_ENTRY_SIZE_MB cannot exceed MAX_TOTAL_UNCOMPRESSED_MB"
            ));
        }

        if self.placeholder_email_domain.is_empty() || self.placeholder_email_domain.contains('@')
        {
            return Err(anyhow::anyhow!(
                "PLACEHOLDER_EMAIL_DOMAIN must be a bare domain name"
            ));
        }

        Ok(())
    }
}
