/*!
 * Configuration management for thingcodec.
 *
 * This module loads the accessory definitions codecs are built from, layering defaults, an
 * optional configuration file and optional environment variables.
 */
use std::collections::BTreeMap;
use std::path::Path;

use config::{Config as ConfigLib, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::codec::DeviceModel;
use crate::error::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Configured accessories
    #[serde(default)]
    pub accessories: Vec<AccessoryConfig>,
}

impl Config {
    /// Look up an accessory by name
    pub fn accessory(&self, name: &str) -> Result<&AccessoryConfig> {
        self.accessories
            .iter()
            .find(|accessory| accessory.name == name)
            .ok_or_else(|| Error::not_found(format!("accessory '{}'", name)))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to use JSON format for logs
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One configured accessory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryConfig {
    /// Accessory name
    pub name: String,

    /// Device model, which selects the codec
    pub model: DeviceModel,

    /// Named topics the codec may publish to directly
    #[serde(default)]
    pub topics: Topics,
}

impl AccessoryConfig {
    /// Create an accessory configuration with no topics
    pub fn new<S: Into<String>>(name: S, model: DeviceModel) -> Self {
        Self {
            name: name.into(),
            model,
            topics: Topics::default(),
        }
    }

    /// Add a named topic
    pub fn with_topic<R: Into<String>, T: Into<String>>(mut self, role: R, topic: T) -> Self {
        self.topics.insert(role, topic);
        self
    }
}

/// Topic names keyed by the role they play for a codec, e.g. `setHeatingThresholdTemperature`.
///
/// Role lookups ignore ASCII case, since configuration sources may fold key case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topics(BTreeMap<String, String>);

impl Topics {
    /// Add or replace a topic for a role
    pub fn insert<R: Into<String>, T: Into<String>>(&mut self, role: R, topic: T) {
        self.0.insert(role.into(), topic.into());
    }

    /// Topic configured for a role, if any
    pub fn get(&self, role: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(role))
            .map(|(_, topic)| topic.as_str())
    }

    /// Topic configured for a role, or a configuration error naming the missing role
    pub fn require(&self, role: &str) -> Result<&str> {
        self.get(role)
            .ok_or_else(|| Error::config(format!("missing topic '{}'", role)))
    }

    /// Number of configured topics
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no topics are configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A builder for creating a configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<String>,
    environment_prefix: Option<String>,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config file path
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Set the environment variable prefix for configuration
    pub fn with_environment_prefix<S: AsRef<str>>(mut self, prefix: S) -> Self {
        self.environment_prefix = Some(prefix.as_ref().to_string());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        let mut config_builder = ConfigLib::builder();

        // Start with default values
        let default_config = Config::default();
        config_builder = config_builder.add_source(
            ConfigLib::try_from(&default_config)
                .map_err(|e| Error::config(format!("Failed to create default config: {}", e)))?,
        );

        if let Some(config_file) = self.config_file {
            let path = Path::new(&config_file);
            if path.exists() {
                debug!("Loading configuration from {}", config_file);
                config_builder = config_builder.add_source(File::with_name(&config_file));
            } else {
                debug!("Configuration file {} does not exist, using defaults", config_file);
            }
        }

        if let Some(prefix) = self.environment_prefix {
            debug!("Loading configuration from environment variables with prefix {}", prefix);
            config_builder = config_builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: Config = config_builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize configuration: {}", e)))?;

        info!(
            accessories = config.accessories.len(),
            "Configuration loaded successfully"
        );
        Ok(config)
    }
}
