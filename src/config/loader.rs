//! Configuration loader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, GroupingError};

use super::{MatchingConfig, RulesConfig};

const CONFIG_FILENAME: &str = ".grouping-rules.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Rules source configuration
    #[serde(default)]
    pub rules: RulesConfig,

    /// Matching configuration
    #[serde(default)]
    pub matching: MatchingConfig,
}

impl Config {
    /// Load configuration from the working directory or return default
    pub fn load_or_default() -> Result<Self, GroupingError> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, GroupingError> {
        let content = fs::read_to_string(path).map_err(|e| {
            GroupingError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        let mut config: Config = toml::from_str(&content).map_err(ConfigError::from)?;

        // A relative rules file is relative to the configuration file.
        if let (Some(file), Some(dir)) = (config.rules.file.as_ref(), path.parent()) {
            if file.is_relative() {
                config.rules.file = Some(dir.join(file));
            }
        }

        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, GroupingError> {
        toml::to_string_pretty(self)
            .map_err(ConfigError::from)
            .map_err(Into::into)
    }
}
