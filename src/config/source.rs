//! Grouping rules source: reading, comment stripping and parsing
//!
//! A rules source is a JSON (or YAML) document whose `grouping_rules` field
//! lists the rule definitions. Lines starting with the comment prefix and
//! blank lines are removed before parsing, so sources can carry `#` comments
//! even though JSON has none.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Top-level field holding the rule definitions.
pub const GROUPING_RULES_KEY: &str = "grouping_rules";

/// Comment prefix used when none is configured.
pub const DEFAULT_COMMENT_PREFIX: &str = "#";

/// Document format of a rules source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Decide from the file extension
    #[default]
    Auto,
    Json,
    Yaml,
}

impl SourceFormat {
    /// Resolve `Auto` against a path: `.yml`/`.yaml` are YAML, anything else JSON.
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            SourceFormat::Auto => {
                let is_yaml = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"))
                    .unwrap_or(false);
                if is_yaml {
                    SourceFormat::Yaml
                } else {
                    SourceFormat::Json
                }
            }
            other => other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Auto => "auto",
            SourceFormat::Json => "json",
            SourceFormat::Yaml => "yaml",
        }
    }
}

/// Drop blank lines and lines starting with `comment_prefix`.
///
/// Only lines whose very first characters are the prefix count as comments;
/// indented `#` is kept. An empty prefix disables comment stripping.
pub fn strip_comments(contents: &str, comment_prefix: &str) -> String {
    let is_comment = |line: &str| !comment_prefix.is_empty() && line.starts_with(comment_prefix);
    contents
        .lines()
        .filter(|line| !line.is_empty() && !is_comment(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read a rules source, stripping comments.
///
/// Returns `Ok(None)` when nothing but comments and blank lines remain.
pub fn read_rules_source(path: &Path, comment_prefix: &str) -> Result<Option<String>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    let stripped = strip_comments(&contents, comment_prefix);
    if stripped.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(stripped))
    }
}

/// Parse stripped source text into a generic document.
pub fn parse_rules_document(text: &str, format: SourceFormat) -> Result<Value, ConfigError> {
    match format {
        SourceFormat::Yaml => {
            serde_yaml::from_str::<Value>(text).map_err(|e| ConfigError::RulesParse {
                format: format.name(),
                message: e.to_string(),
            })
        }
        SourceFormat::Json | SourceFormat::Auto => {
            serde_json::from_str::<Value>(text).map_err(|e| ConfigError::RulesParse {
                format: SourceFormat::Json.name(),
                message: e.to_string(),
            })
        }
    }
}

/// The `grouping_rules` sequence of a parsed document.
pub fn extract_definitions(document: &Value) -> Result<&[Value], ConfigError> {
    document
        .get(GROUPING_RULES_KEY)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(ConfigError::MissingRulesList)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_strip_comments() {
        let contents = "# header\n{\n\n  \"grouping_rules\": []\n# trailing\n}\n";
        assert_eq!(
            strip_comments(contents, "#"),
            "{\n  \"grouping_rules\": []\n}"
        );
    }

    #[test]
    fn test_strip_comments_keeps_indented_hash() {
        let contents = "{\n  # not a comment\n}";
        assert_eq!(strip_comments(contents, "#"), contents);
    }

    #[test]
    fn test_strip_comments_custom_prefix() {
        assert_eq!(strip_comments("// one\n{}\n", "//"), "{}");
    }

    #[test]
    fn test_strip_comments_empty_prefix_keeps_content() {
        let stripped = strip_comments("{\n\n\"a\": 1\n}\n", "");
        assert_eq!(stripped, "{\n\"a\": 1\n}");
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(
            SourceFormat::Auto.resolve(&PathBuf::from("rules.yaml")),
            SourceFormat::Yaml
        );
        assert_eq!(
            SourceFormat::Auto.resolve(&PathBuf::from("rules.YML")),
            SourceFormat::Yaml
        );
        assert_eq!(
            SourceFormat::Auto.resolve(&PathBuf::from("grouping_rules.conf")),
            SourceFormat::Json
        );
        assert_eq!(
            SourceFormat::Yaml.resolve(&PathBuf::from("rules.json")),
            SourceFormat::Yaml
        );
    }

    #[test]
    fn test_read_rules_source_only_comments() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.conf");
        fs::write(&path, "# nothing here\n\n# at all\n").unwrap();

        assert_eq!(read_rules_source(&path, "#").unwrap(), None);
    }

    #[test]
    fn test_read_rules_source_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_rules_source(&temp_dir.path().join("absent.conf"), "#").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn test_parse_json_and_yaml_agree() {
        let from_json = parse_rules_document(
            r#"{"grouping_rules": [{"fields": ["entityId"], "regex": "x", "destination": "d"}]}"#,
            SourceFormat::Json,
        )
        .unwrap();
        let from_yaml = parse_rules_document(
            "grouping_rules:\n  - fields: [entityId]\n    regex: x\n    destination: d\n",
            SourceFormat::Yaml,
        )
        .unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_rules_document("{\"grouping_rules\": [", SourceFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::RulesParse { format: "json", .. }));
    }

    #[test]
    fn test_extract_definitions() {
        let doc = json!({"grouping_rules": [{"a": 1}, {"b": 2}]});
        assert_eq!(extract_definitions(&doc).unwrap().len(), 2);

        for malformed in [
            json!({"rules": []}),
            json!({"grouping_rules": {"fields": []}}),
            json!([1, 2, 3]),
        ] {
            assert!(matches!(
                extract_definitions(&malformed),
                Err(ConfigError::MissingRulesList)
            ));
        }
    }
}
