//! # Bootstrap Results
//!
//! Structures describing what happened while building a rule set from a
//! configuration source.
//!
//! - [`BootstrapStatus`] - What became of the source as a whole
//! - [`DefinitionOutcome`] - What became of each raw definition in it
//! - [`BootstrapReport`] - Both, in source order
//!
//! ## Example
//!
//! ```rust
//! use grouping_rules::rules::GroupingRules;
//! use serde_json::json;
//!
//! let (rules, report) = GroupingRules::from_definitions(&[
//!     json!({"fields": ["entityType"], "regex": "Room", "destination": "rooms"}),
//!     json!({"fields": ["entityType"], "regex": ".*"}),
//! ]);
//!
//! assert_eq!(rules.len(), 1);
//! assert_eq!(report.accepted_count(), 1);
//! assert_eq!(report.discarded().count(), 1);
//! ```

use serde::Serialize;

use crate::error::RuleError;

/// Outcome of reading the configuration source as a whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BootstrapStatus {
    /// No source configured, or nothing left once comments were stripped.
    NoContent,
    /// The source could not be read.
    Unreadable { error: String },
    /// The source is not a document with a `grouping_rules` list.
    Malformed { error: String },
    /// Definitions were processed.
    Loaded { accepted: usize, discarded: usize },
}

/// What became of a single raw definition.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionStatus {
    /// Compiled and inserted under `id`.
    Accepted { id: u64 },
    /// Rejected; the definition was not inserted.
    Discarded { reason: RuleError },
}

/// Outcome for the definition at `index` in the source list.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionOutcome {
    pub index: usize,
    pub status: DefinitionStatus,
}

impl DefinitionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, DefinitionStatus::Accepted { .. })
    }

    /// The rejection reason, if the definition was discarded.
    pub fn reason(&self) -> Option<&RuleError> {
        match &self.status {
            DefinitionStatus::Discarded { reason } => Some(reason),
            DefinitionStatus::Accepted { .. } => None,
        }
    }
}

/// Full account of a bootstrap run.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapReport {
    pub status: BootstrapStatus,
    pub outcomes: Vec<DefinitionOutcome>,
}

impl BootstrapReport {
    pub fn no_content() -> Self {
        Self::failed(BootstrapStatus::NoContent)
    }

    pub fn unreadable(error: impl ToString) -> Self {
        Self::failed(BootstrapStatus::Unreadable {
            error: error.to_string(),
        })
    }

    pub fn malformed(error: impl ToString) -> Self {
        Self::failed(BootstrapStatus::Malformed {
            error: error.to_string(),
        })
    }

    fn failed(status: BootstrapStatus) -> Self {
        Self {
            status,
            outcomes: Vec::new(),
        }
    }

    /// Build a report from per-definition outcomes.
    pub fn loaded(outcomes: Vec<DefinitionOutcome>) -> Self {
        let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
        let discarded = outcomes.len() - accepted;
        Self {
            status: BootstrapStatus::Loaded {
                accepted,
                discarded,
            },
            outcomes,
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_accepted()).count()
    }

    /// Definitions that were rejected, in source order.
    pub fn discarded(&self) -> impl Iterator<Item = &DefinitionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_accepted())
    }

    /// True when the source itself could not be used.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self.status,
            BootstrapStatus::Unreadable { .. } | BootstrapStatus::Malformed { .. }
        )
    }

    /// True when every definition was accepted and the source was usable.
    pub fn is_clean(&self) -> bool {
        !self.is_source_failure() && self.discarded().next().is_none()
    }
}
