//! Configuration loading for infrastructure adapters.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const ENV_CACHE_TTL_SECS: &str = "KEYWARD_CACHE_TTL_SECS";

const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value for {key}: '{value}'")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

/// Credential cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(ENV_CACHE_TTL_SECS) else {
            return Ok(Self::default());
        };

        let ttl_secs = raw.trim().parse::<u64>().map_err(|_| ConfigError {
            key: ENV_CACHE_TTL_SECS,
            value: raw.clone(),
        })?;

        Ok(Self { ttl_secs })
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
