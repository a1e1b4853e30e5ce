use std::env;
use std::fmt;

use crate::hyperliquid::client::DEFAULT_INFO_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Some(StoreBackend::Postgres),
            "memory" | "mem" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_backend: StoreBackend,
    /// Required for the postgres backend.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,

    // Hyperliquid polling
    pub hyperliquid_info_url: String,
    pub poll_interval_secs: u64,
    pub poller_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_raw = env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".into());
        let store_backend = StoreBackend::from_str(&backend_raw)
            .ok_or_else(|| anyhow::anyhow!("unknown STORE_BACKEND: {backend_raw}"))?;

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set for the postgres backend");
        }

        Ok(Self {
            store_backend,
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".into())
                .parse()?,

            hyperliquid_info_url: env::var("HYPERLIQUID_INFO_URL")
                .unwrap_or_else(|_| DEFAULT_INFO_URL.into()),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
            poller_enabled: env::var("POLLER_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
        })
    }

    /// Config for tests and local runs: memory store, poller off.
    pub fn in_memory() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            hyperliquid_info_url: DEFAULT_INFO_URL.into(),
            poll_interval_secs: 30,
            poller_enabled: false,
        }
    }
}
