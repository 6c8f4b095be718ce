//! Secret matcher configuration.
//!
//! Values are read from the process environment (`KEYWARD_ARGON2_*`) with
//! the Argon2 recommended defaults as fallback.

use serde::Deserialize;
use thiserror::Error;

pub const ENV_MEMORY_KIB: &str = "KEYWARD_ARGON2_MEMORY_KIB";
pub const ENV_ITERATIONS: &str = "KEYWARD_ARGON2_ITERATIONS";
pub const ENV_PARALLELISM: &str = "KEYWARD_ARGON2_PARALLELISM";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl MatcherConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Unset keys keep their default; set-but-unparseable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            memory_kib: read_u32(&lookup, ENV_MEMORY_KIB, defaults.memory_kib)?,
            iterations: read_u32(&lookup, ENV_ITERATIONS, defaults.iterations)?,
            parallelism: read_u32(&lookup, ENV_PARALLELISM, defaults.parallelism)?,
        })
    }

    /// Smallest parameters Argon2 accepts. Only suitable for tests.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: argon2::Params::MIN_M_COST,
            iterations: argon2::Params::MIN_T_COST,
            parallelism: argon2::Params::MIN_P_COST,
        }
    }

    pub(crate) fn to_params(self) -> Result<argon2::Params, argon2::Error> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
    }
}

fn read_u32<F>(lookup: &F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or(ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_keys_fall_back_to_defaults() {
        let cfg = MatcherConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, MatcherConfig::default());
        assert_eq!(cfg.memory_kib, 19 * 1024);
        assert_eq!(cfg.iterations, 2);
        assert_eq!(cfg.parallelism, 1);
    }

    #[test]
    fn set_keys_override_defaults() {
        let cfg = MatcherConfig::from_lookup(lookup_from(&[
            (ENV_MEMORY_KIB, "65536"),
            (ENV_ITERATIONS, " 3 "),
        ]))
        .unwrap();
        assert_eq!(cfg.memory_kib, 65536);
        assert_eq!(cfg.iterations, 3);
        assert_eq!(cfg.parallelism, 1);
    }

    #[test]
    fn garbage_values_are_rejected() {
        let err =
            MatcherConfig::from_lookup(lookup_from(&[(ENV_PARALLELISM, "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: ENV_PARALLELISM,
                value: "lots".to_string()
            }
        );

        let err = MatcherConfig::from_lookup(lookup_from(&[(ENV_ITERATIONS, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_ITERATIONS, .. }));
    }

    #[test]
    fn deserializes_partial_documents() {
        let cfg: MatcherConfig = serde_json::from_str(r#"{"iterations": 4}"#).unwrap();
        assert_eq!(cfg.iterations, 4);
        assert_eq!(cfg.memory_kib, MatcherConfig::default().memory_kib);
    }

    #[test]
    fn insecure_fast_params_are_valid() {
        assert!(MatcherConfig::insecure_fast().to_params().is_ok());
    }
}
