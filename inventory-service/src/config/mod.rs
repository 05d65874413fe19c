use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Which store implementation backs the service.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" => Ok(StoreBackend::Postgres),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl InventoryConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix.
        let common = core_config::Config::load()?;

        let backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let database_url = env::var("DATABASE_URL").ok();
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_URL is required when STORE_BACKEND=postgres"
            )));
        }

        Ok(InventoryConfig {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "inventory-service".to_string()),
            store: StoreConfig {
                backend,
                database_url,
                max_connections: parse_env_or("DB_MAX_CONNECTIONS", 10)?,
                min_connections: parse_env_or("DB_MIN_CONNECTIONS", 1)?,
            },
        })
    }
}

fn parse_env_or(key: &str, default: u32) -> Result<u32, AppError> {
    match env::var(key) {
        Ok(val) => val.parse().map_err(|_| {
            AppError::ConfigError(anyhow::anyhow!("{} must be a number, got '{}'", key, val))
        }),
        Err(_) => Ok(default),
    }
}
