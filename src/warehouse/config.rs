//! Warehouse connection configuration.
//!
//! Credentials and the compute-pool identifier come from the process
//! environment and are read once at connect time. The account target,
//! database, and schema are fixed constants: the dashboard only ever
//! talks to the one city crash warehouse.

use crate::{CrashmapError, Result};
use std::env;

/// Environment variable holding the warehouse principal.
pub const ENV_USER: &str = "CRASH_WAREHOUSE_USER";
/// Environment variable holding the warehouse credential.
pub const ENV_PASSWORD: &str = "CRASH_WAREHOUSE_PASSWORD";
/// Environment variable holding the compute-pool identifier.
pub const ENV_POOL: &str = "CRASH_WAREHOUSE_POOL";

/// Fixed account endpoint for the city warehouse.
pub const WAREHOUSE_HOST: &str = "warehouse.us-east-1.grdata.net";
/// Fixed database and schema targets.
pub const DATABASE: &str = "miaccidentdata";
pub const SCHEMA: &str = "miaccident";

/// Everything needed to open a warehouse session.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub user: String,
    pub password: String,
    /// Compute-pool identifier, passed through as a session option.
    pub pool: String,
}

impl WarehouseConfig {
    /// Read the configuration from the process environment.
    ///
    /// Fails fast with [`CrashmapError::Config`] naming the first
    /// missing variable; the server refuses to start without all three.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| {
                CrashmapError::Config(format!("missing required environment variable {name}"))
            })
        };

        Ok(Self {
            user: require(ENV_USER)?,
            password: require(ENV_PASSWORD)?,
            pool: require(ENV_POOL)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_complete_environment() {
        let vars = env_of(&[
            (ENV_USER, "dashboard"),
            (ENV_PASSWORD, "hunter2"),
            (ENV_POOL, "viz_pool"),
        ]);
        let config = WarehouseConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.user, "dashboard");
        assert_eq!(config.password, "hunter2");
        assert_eq!(config.pool, "viz_pool");
    }

    #[test]
    fn test_missing_variable_is_fatal() {
        let vars = env_of(&[(ENV_USER, "dashboard"), (ENV_PASSWORD, "hunter2")]);
        let err = WarehouseConfig::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(err, CrashmapError::Config(_)));
        assert!(err.to_string().contains(ENV_POOL));
    }

    #[test]
    fn test_empty_environment_names_first_missing() {
        let err = WarehouseConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains(ENV_USER));
    }
}
