//! Error types for grouping-rules
//!
//! This module defines custom error types using `thiserror`. Every failure the
//! engine can detect is recovered at the point of detection and surfaced as one
//! of these values; none of them unwind engine state.

use thiserror::Error;

/// Main error type for grouping-rules
#[derive(Error, Debug)]
pub enum GroupingError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Output serialization errors
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Errors raised while loading the application configuration or a rules source
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The TOML configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration could not be serialized back to TOML
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The rules source is not a well-formed document
    #[error("Grouping rules syntax has errors ({format}): {message}")]
    RulesParse {
        /// Source format that was attempted
        format: &'static str,
        /// Parser diagnostic
        message: String,
    },

    /// The document has no `grouping_rules` sequence at its top level
    #[error("Document has no 'grouping_rules' list")]
    MissingRulesList,
}

/// Errors raised while turning a raw definition into a compiled [`Rule`](crate::rules::Rule)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// The raw definition failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The pattern text is not a valid regular expression
    #[error("Invalid regex '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern source text as supplied
        pattern: String,
        /// The compiler diagnostic
        source: regex::Error,
    },
}

impl RuleError {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            RuleError::Validation(e) => e.kind(),
            RuleError::InvalidPattern { .. } => "invalid_pattern",
        }
    }
}

/// Validation outcomes for a raw rule definition, one variant per rejection kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required key is absent (or present with an unusable type)
    #[error("some field is missing: '{key}'")]
    MissingField {
        /// Canonical name of the missing key
        key: &'static str,
    },

    /// A required key is present but empty
    #[error("some field is empty: '{key}'")]
    EmptyField {
        /// Canonical name of the empty key
        key: &'static str,
    },

    /// The field list names an attribute that is not recognized
    #[error("some field is not allowed: '{name}'")]
    DisallowedField {
        /// The offending attribute name
        name: String,
    },

    /// A path-valued attribute does not start with '/'
    #[error("the service path '{path}' does not start with '/'")]
    MalformedPath {
        /// The offending path
        path: String,
    },
}

impl ValidationError {
    /// Short machine-friendly name of the validation kind
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "missing_field",
            ValidationError::EmptyField { .. } => "empty_field",
            ValidationError::DisallowedField { .. } => "disallowed_field",
            ValidationError::MalformedPath { .. } => "malformed_path",
        }
    }
}
