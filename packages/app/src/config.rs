//! Environment-driven configuration for the workbench binary.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use pool_core::PoolConfig;
use service::ServiceConfig;
use thiserror::Error;

/// Repository backing the entity service demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Memory,
    Surreal,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "surreal" | "surrealdb" => Ok(Self::Surreal),
            other => Err(ConfigError::Invalid {
                var: "WORKBENCH_DB",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

/// Settings for one workbench run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub pool: PoolConfig,
    /// Number of jobs the producer submits, payloads `1..=jobs`.
    pub jobs: i64,
    pub store: StoreKind,
    pub service: ServiceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            jobs: 10,
            store: StoreKind::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `WORKBENCH_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(workers) = parse(&lookup, "WORKBENCH_WORKERS")? {
            config.pool = config.pool.with_workers(workers);
        }
        if let Some(capacity) = parse(&lookup, "WORKBENCH_CAPACITY")? {
            config.pool = config.pool.with_capacity(capacity);
        }
        if let Some(latency) = parse(&lookup, "WORKBENCH_LATENCY_MS")? {
            config.pool = config.pool.with_latency_ms(latency);
        }
        if let Some(jobs) = parse(&lookup, "WORKBENCH_JOBS")? {
            config.jobs = jobs;
        }
        if let Some(store) = parse(&lookup, "WORKBENCH_DB")? {
            config.store = store;
        }
        if let Some(secs) = parse(&lookup, "WORKBENCH_TIMEOUT_SECS")? {
            config.service = config
                .service
                .with_default_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
