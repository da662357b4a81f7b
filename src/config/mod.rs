//! Configuration module

pub mod loader;
pub mod source;

pub use loader::Config;
pub use source::SourceFormat;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rules source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Path of the grouping rules document; no path means an empty rule set
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Lines starting with this prefix are ignored
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,

    /// Document format (auto, json, yaml)
    #[serde(default)]
    pub format: SourceFormat,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            file: None,
            comment_prefix: default_comment_prefix(),
            format: SourceFormat::Auto,
        }
    }
}

fn default_comment_prefix() -> String {
    source::DEFAULT_COMMENT_PREFIX.to_string()
}

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MatchingConfig {
    /// Destination reported when no rule matches
    #[serde(default)]
    pub default_destination: Option<String>,
}
