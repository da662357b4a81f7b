//! Grouping rules engine
//!
//! [`GroupingRules`] owns the ordered rule list. Matching walks an immutable
//! snapshot of the list, so it never blocks on (or observes) a writer halfway
//! through a mutation. Writers serialize on the lock and replace the snapshot
//! copy-on-write: a list still held by an in-flight matcher is cloned, an
//! unshared one is edited in place.

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

use super::field::EventAttributes;
use super::results::{BootstrapReport, DefinitionOutcome, DefinitionStatus};
use super::rule::Rule;
use crate::config::source::{
    extract_definitions, parse_rules_document, read_rules_source, GROUPING_RULES_KEY,
};
use crate::config::RulesConfig;
use crate::error::GroupingError;

/// Ordered rule list shared by matchers.
pub type Snapshot = Arc<Vec<Arc<Rule>>>;

#[derive(Debug, Default)]
struct RuleSet {
    rules: Snapshot,
    last_index: u64,
}

impl RuleSet {
    /// Assign the next id to `rule` and append it.
    fn push(&mut self, rule: Rule) -> u64 {
        self.last_index += 1;
        let id = self.last_index;
        Arc::make_mut(&mut self.rules).push(Arc::new(rule.with_id(id)));
        id
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.rules.iter().position(|rule| rule.id() == id)
    }
}

/// Ordered, concurrently readable set of grouping rules
#[derive(Debug, Default)]
pub struct GroupingRules {
    inner: RwLock<RuleSet>,
}

impl GroupingRules {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set from raw definitions.
    ///
    /// Definitions are validated and compiled in order; the ones that fail are
    /// discarded with a warning and reported, the rest get ids from 1 upward.
    pub fn from_definitions(definitions: &[Value]) -> (Self, BootstrapReport) {
        let mut set = RuleSet::default();
        let mut outcomes = Vec::with_capacity(definitions.len());

        for (index, definition) in definitions.iter().enumerate() {
            let status = match Rule::from_value(definition) {
                Ok(rule) => DefinitionStatus::Accepted { id: set.push(rule) },
                Err(reason) => {
                    warn!(
                        index,
                        kind = reason.kind(),
                        error = %reason,
                        definition = %definition,
                        "Invalid grouping rule, it will be discarded"
                    );
                    DefinitionStatus::Discarded { reason }
                }
            };
            outcomes.push(DefinitionOutcome { index, status });
        }

        let report = BootstrapReport::loaded(outcomes);
        info!(
            accepted = report.accepted_count(),
            discarded = report.outcomes.len() - report.accepted_count(),
            "Grouping rules regexes have been compiled"
        );

        let rules = Self {
            inner: RwLock::new(set),
        };
        (rules, report)
    }

    /// Build a rule set from a parsed document holding a `grouping_rules` list.
    ///
    /// A document without such a list yields an empty set.
    pub fn from_document(document: &Value) -> (Self, BootstrapReport) {
        match extract_definitions(document) {
            Ok(definitions) => Self::from_definitions(definitions),
            Err(e) => {
                warn!(key = GROUPING_RULES_KEY, error = %e, "Grouping rules syntax has errors");
                (Self::new(), BootstrapReport::malformed(e))
            }
        }
    }

    /// Build a rule set from the configured source.
    ///
    /// Never fails: an absent, unreadable or malformed source yields an empty
    /// set and the report says why.
    pub fn load(config: &RulesConfig) -> (Self, BootstrapReport) {
        let Some(path) = config.file.as_deref() else {
            info!("No grouping rules have been read");
            return (Self::new(), BootstrapReport::no_content());
        };
        Self::load_file(path, config)
    }

    fn load_file(path: &Path, config: &RulesConfig) -> (Self, BootstrapReport) {
        let text = match read_rules_source(path, &config.comment_prefix) {
            Ok(Some(text)) => text,
            Ok(None) => {
                info!(path = %path.display(), "No grouping rules have been read");
                return (Self::new(), BootstrapReport::no_content());
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Error while reading the grouping rules file");
                return (Self::new(), BootstrapReport::unreadable(e));
            }
        };

        debug!(path = %path.display(), content = %text, "Grouping rules read");

        let format = config.format.resolve(path);
        match parse_rules_document(&text, format) {
            Ok(document) => {
                info!(path = %path.display(), format = format.name(), "Grouping rules syntax is OK");
                Self::from_document(&document)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Grouping rules syntax has errors");
                (Self::new(), BootstrapReport::malformed(e))
            }
        }
    }

    /// First rule, in list order, whose pattern matches the whole probe built
    /// from the event attributes. `None` when nothing matches.
    pub fn find_match(&self, attributes: &EventAttributes<'_>) -> Option<Arc<Rule>> {
        let rules = self.snapshot();
        rules
            .iter()
            .find(|rule| rule.matches(attributes))
            .map(Arc::clone)
    }

    /// Convenience form of [`find_match`](Self::find_match).
    pub fn matching_rule(
        &self,
        service_path: &str,
        entity_id: &str,
        entity_type: &str,
    ) -> Option<Arc<Rule>> {
        self.find_match(&EventAttributes::new(service_path, entity_id, entity_type))
    }

    /// Append `rule` under a fresh id, which is returned. Any id the rule
    /// carried is ignored.
    pub fn add(&self, rule: Rule) -> u64 {
        let id = self.write().push(rule);
        info!(rule_id = id, "Added grouping rule");
        id
    }

    /// Replace the rule with `id` in place, keeping its position and id.
    ///
    /// Returns `false`, leaving the set untouched, when no rule has that id.
    pub fn update(&self, id: u64, rule: Rule) -> bool {
        let mut set = self.write();
        let Some(index) = set.position(id) else {
            debug!(rule_id = id, "No grouping rule to update");
            return false;
        };
        Arc::make_mut(&mut set.rules)[index] = Arc::new(rule.with_id(id));
        info!(rule_id = id, position = index, "Updated grouping rule");
        true
    }

    /// Remove the rule with `id`. Its id is never handed out again.
    ///
    /// Returns `false`, leaving the set untouched, when no rule has that id.
    pub fn delete(&self, id: u64) -> bool {
        let mut set = self.write();
        let Some(index) = set.position(id) else {
            debug!(rule_id = id, "No grouping rule to delete");
            return false;
        };
        Arc::make_mut(&mut set.rules).remove(index);
        info!(rule_id = id, "Deleted grouping rule");
        true
    }

    /// Current ordered rule list. Later mutations do not affect it.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.read().rules)
    }

    /// Id most recently assigned, `0` if none yet.
    pub fn last_id(&self) -> u64 {
        self.read().last_index
    }

    pub fn len(&self) -> usize {
        self.read().rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().rules.is_empty()
    }

    /// Serialized view of the rule set.
    ///
    /// `as_field` renders `"grouping_rules": [...]`, ready to embed in an
    /// enclosing object; otherwise a full `{"grouping_rules": [...]}` document.
    pub fn to_json(&self, as_field: bool) -> Result<String, GroupingError> {
        let snapshot = self.snapshot();
        let grouping_rules: Vec<&Rule> = snapshot.iter().map(Arc::as_ref).collect();
        if as_field {
            let list = serde_json::to_string(&grouping_rules)?;
            Ok(format!("\"{GROUPING_RULES_KEY}\": {list}"))
        } else {
            Ok(serde_json::to_string(&RulesDocument { grouping_rules })?)
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RuleSet> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RuleSet> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Serialize)]
struct RulesDocument<'a> {
    grouping_rules: Vec<&'a Rule>,
}
