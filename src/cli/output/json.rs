//! JSON output formatting

use serde::Serialize;

use super::{MatchOutcome, OutputRenderer};
use crate::error::GroupingError;
use crate::rules::{
    BootstrapReport, BootstrapStatus, DefinitionStatus, EventAttributes, GroupingRules, Rule,
};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    version: &'static str,
    source: &'a BootstrapStatus,
    definitions: Vec<DefinitionSummary>,
    grouping_rules: Vec<&'a Rule>,
}

#[derive(Serialize)]
struct DefinitionSummary {
    index: usize,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    service_path: &'a str,
    entity_id: &'a str,
    entity_type: &'a str,
    matched: bool,
    destination: Option<&'a str>,
    rule: Option<&'a Rule>,
}

impl OutputRenderer for JsonOutput {
    fn render_bootstrap(
        &self,
        report: &BootstrapReport,
        rules: &GroupingRules,
    ) -> Result<String, GroupingError> {
        let snapshot = rules.snapshot();
        let definitions = report
            .outcomes
            .iter()
            .map(|outcome| match &outcome.status {
                DefinitionStatus::Accepted { id } => DefinitionSummary {
                    index: outcome.index,
                    accepted: true,
                    id: Some(*id),
                    kind: None,
                    reason: None,
                },
                DefinitionStatus::Discarded { reason } => DefinitionSummary {
                    index: outcome.index,
                    accepted: false,
                    id: None,
                    kind: Some(reason.kind()),
                    reason: Some(reason.to_string()),
                },
            })
            .collect();

        let output = CheckOutput {
            version: env!("CARGO_PKG_VERSION"),
            source: &report.status,
            definitions,
            grouping_rules: snapshot.iter().map(|rule| rule.as_ref()).collect(),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn render_match(
        &self,
        attributes: &EventAttributes<'_>,
        outcome: &MatchOutcome,
    ) -> Result<String, GroupingError> {
        let rule = match outcome {
            MatchOutcome::Rule(rule) => Some(rule.as_ref()),
            _ => None,
        };
        let output = MatchOutput {
            service_path: attributes.service_path,
            entity_id: attributes.entity_id,
            entity_type: attributes.entity_type,
            matched: rule.is_some(),
            destination: outcome.destination(),
            rule,
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}
