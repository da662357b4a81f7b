//! Terminal output formatting with colors

use colored::Colorize;

use super::{MatchOutcome, OutputRenderer};
use crate::error::GroupingError;
use crate::rules::{
    BootstrapReport, BootstrapStatus, DefinitionOutcome, DefinitionStatus, EventAttributes,
    GroupingRules, Rule,
};

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, title: &str) -> String {
        format!(
            "\n{} v{}\n\n{}\n{}\n\n",
            "grouping-rules".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "━".repeat(50).dimmed(),
            format!("  {title}").bold()
        )
    }

    fn format_status(&self, status: &BootstrapStatus) -> String {
        match status {
            BootstrapStatus::NoContent => {
                format!("{}\n", "No grouping rules have been read.".yellow())
            }
            BootstrapStatus::Unreadable { error } => {
                format!("{} {}\n", "Unreadable source:".red().bold(), error)
            }
            BootstrapStatus::Malformed { error } => {
                format!("{} {}\n", "Malformed source:".red().bold(), error)
            }
            BootstrapStatus::Loaded {
                accepted,
                discarded,
            } => format!(
                "Accepted: {} │ Discarded: {}\n",
                accepted.to_string().green().bold(),
                discarded.to_string().red().bold()
            ),
        }
    }

    fn format_outcome(&self, outcome: &DefinitionOutcome, rule: Option<&Rule>) -> String {
        match &outcome.status {
            DefinitionStatus::Accepted { id } => {
                let mut output = format!(
                    "  {} #{} → id {}",
                    "✓".green(),
                    outcome.index,
                    id.to_string().cyan()
                );
                if let Some(rule) = rule {
                    output.push_str(&format!(
                        " {} {}",
                        rule.pattern().dimmed(),
                        rule.destination().white().bold()
                    ));
                }
                output.push('\n');
                output
            }
            DefinitionStatus::Discarded { reason } => format!(
                "  {} #{} [{}] {}\n",
                "✗".red(),
                outcome.index,
                reason.kind().yellow(),
                reason
            ),
        }
    }

    fn format_rule(&self, rule: &Rule) -> String {
        let fields: Vec<&str> = rule.fields().iter().map(|f| f.as_str()).collect();
        format!(
            "  {} [{}] {} {}\n",
            format!("#{}", rule.id()).cyan(),
            fields.join(", "),
            rule.pattern().dimmed(),
            rule.destination().white().bold()
        )
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputRenderer for TerminalOutput {
    fn render_bootstrap(
        &self,
        report: &BootstrapReport,
        rules: &GroupingRules,
    ) -> Result<String, GroupingError> {
        let snapshot = rules.snapshot();
        let mut output = self.format_header("GROUPING RULES CHECK");
        output.push_str(&self.format_status(&report.status));

        if !report.outcomes.is_empty() {
            output.push('\n');
        }
        for outcome in &report.outcomes {
            let rule = match outcome.status {
                DefinitionStatus::Accepted { id } => {
                    snapshot.iter().find(|r| r.id() == id).map(|r| r.as_ref())
                }
                DefinitionStatus::Discarded { .. } => None,
            };
            output.push_str(&self.format_outcome(outcome, rule));
        }

        Ok(output)
    }

    fn render_match(
        &self,
        attributes: &EventAttributes<'_>,
        outcome: &MatchOutcome,
    ) -> Result<String, GroupingError> {
        let mut output = self.format_header("MATCH");
        output.push_str(&format!(
            "{} {}\n{} {}\n{} {}\n\n",
            "Service path:".dimmed(),
            attributes.service_path,
            "Entity id:   ".dimmed(),
            attributes.entity_id,
            "Entity type: ".dimmed(),
            attributes.entity_type
        ));

        match outcome {
            MatchOutcome::Rule(rule) => {
                output.push_str(&format!("{}\n", "Matched rule:".green().bold()));
                output.push_str(&self.format_rule(rule));
            }
            MatchOutcome::Fallback(destination) => {
                output.push_str(&format!(
                    "{} using default destination {}\n",
                    "No rule matched,".yellow(),
                    destination.white().bold()
                ));
            }
            MatchOutcome::NoMatch => {
                output.push_str(&format!("{}\n", "No rule matched.".yellow()));
            }
        }

        Ok(output)
    }
}
