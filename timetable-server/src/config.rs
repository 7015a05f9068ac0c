//! Server configuration from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::schedule::DEFAULT_BASE_URL;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STORE: &str = "data/store.json";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_CACHE_TTL_SECS: &str = "60";

/// A variable was set but could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub store_path: PathBuf,
    pub static_dir: PathBuf,
    pub schedule_url: String,
    pub cache_ttl: Duration,
}

impl ServerConfig {
    /// Read `TIMETABLE_ADDR`, `TIMETABLE_STORE`, `TIMETABLE_STATIC_DIR`,
    /// `SCHEDULE_API_URL` and `SCHEDULE_CACHE_TTL_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ServerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let ttl_secs: u64 = try_load(&lookup, "SCHEDULE_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        Ok(Self {
            addr: try_load(&lookup, "TIMETABLE_ADDR", DEFAULT_ADDR)?,
            store_path: try_load(&lookup, "TIMETABLE_STORE", DEFAULT_STORE)?,
            static_dir: try_load(&lookup, "TIMETABLE_STATIC_DIR", DEFAULT_STATIC_DIR)?,
            schedule_url: try_load(&lookup, "SCHEDULE_API_URL", DEFAULT_BASE_URL)?,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError {
            key,
            reason: e.to_string(),
            value,
        }
    })
}
