use std::path::Path;

use anyhow::{Context, Result, ensure};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use service_discovery_sdk::ServiceType;

/// Environment prefix for configuration overrides.
///
/// Example: `SERVICE_DISCOVERY__DEFAULT_SQL_PORT=26300` maps to `default_sql_port`.
pub const ENV_PREFIX: &str = "SERVICE_DISCOVERY__";

/// Configuration for the `service_discovery` module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceDiscoveryConfig {
    /// Port assumed for SQL when no service record exists.
    #[serde(default = "default_sql_port")]
    pub default_sql_port: u16,

    /// Port assumed for the admin UI when no service record exists.
    #[serde(default = "default_ui_port")]
    pub default_ui_port: u16,

    #[serde(default)]
    pub registration_mode: RegistrationMode,
}

/// Which provider groups `register_services` submits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationMode {
    /// Submit every provider group.
    #[default]
    AllProviders,
    /// Submit only the first provider group (legacy behavior).
    FirstProviderOnly,
}

impl Default for ServiceDiscoveryConfig {
    fn default() -> Self {
        Self {
            default_sql_port: default_sql_port(),
            default_ui_port: default_ui_port(),
            registration_mode: RegistrationMode::default(),
        }
    }
}

fn default_sql_port() -> u16 {
    26257
}

fn default_ui_port() -> u16 {
    26258
}

impl ServiceDiscoveryConfig {
    /// Fallback port for a service type.
    #[must_use]
    pub const fn default_port(&self, service_type: ServiceType) -> u16 {
        match service_type {
            ServiceType::Sql => self.default_sql_port,
            ServiceType::Ui => self.default_ui_port,
        }
    }

    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    ///
    /// # Errors
    /// Returns an error if the merged configuration cannot be extracted.
    pub fn load_layered(config_path: &Path) -> Result<Self> {
        Self::extract(Self::figment().merge(Yaml::file(config_path)))
    }

    /// Load configuration from file, or from defaults and environment variables.
    ///
    /// # Errors
    /// Returns an error if the given file does not exist or the configuration
    /// cannot be extracted.
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            ensure!(
                path.is_file(),
                "config file does not exist: {}",
                path.to_string_lossy()
            );
            Self::load_layered(path)
        } else {
            Self::extract(Self::figment())
        }
    }

    fn figment() -> Figment {
        Figment::new().merge(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Result<Self> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract service discovery config from figment")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
