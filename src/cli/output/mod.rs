//! Output formatting module for CLI

pub mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use std::sync::Arc;

use crate::error::GroupingError;
use crate::rules::{BootstrapReport, EventAttributes, GroupingRules, Rule};

/// Result of classifying one event
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// A rule matched
    Rule(Arc<Rule>),
    /// No rule matched; the configured default destination applies
    Fallback(String),
    /// No rule matched and there is no default destination
    NoMatch,
}

impl MatchOutcome {
    /// Destination the event is grouped into, if any
    pub fn destination(&self) -> Option<&str> {
        match self {
            MatchOutcome::Rule(rule) => Some(rule.destination()),
            MatchOutcome::Fallback(destination) => Some(destination),
            MatchOutcome::NoMatch => None,
        }
    }
}

/// Trait for rendering command output
pub trait OutputRenderer {
    fn render_bootstrap(
        &self,
        report: &BootstrapReport,
        rules: &GroupingRules,
    ) -> Result<String, GroupingError>;

    fn render_match(
        &self,
        attributes: &EventAttributes<'_>,
        outcome: &MatchOutcome,
    ) -> Result<String, GroupingError>;
}
