//! Immutable, validated intent table.
//!
//! Built once at startup from the embedded JSON definition (or a JSON file
//! of the same shape) and shared read-only for the process lifetime. A
//! defective definition fails construction, so request handling never sees
//! an intent without patterns or responses.
//!
//! Lookup is split across submodules:
//! - [`matcher`]: first-match substring scan, question → tag.
//! - [`selector`]: reply policy, tag → reply.

pub mod matcher;
pub mod selector;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cb_protocol::IntentRecord;

/// Built-in intent definitions.
const BUILTIN_INTENTS: &str = include_str!("../../data/intents.json");

/// Defects in an intent definition, reported at startup.
#[derive(Debug, thiserror::Error)]
pub enum IntentTableError {
    #[error("intent table is empty")]
    Empty,

    #[error("intent #{index} has an empty tag")]
    EmptyTag { index: usize },

    #[error("duplicate intent tag '{0}'")]
    DuplicateTag(String),

    #[error("intent '{0}' has no patterns")]
    NoPatterns(String),

    #[error("intent '{tag}' has an empty pattern at position {position}")]
    EmptyPattern { tag: String, position: usize },

    #[error("intent '{0}' has no responses")]
    NoResponses(String),

    #[error("failed to read intent file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse intent definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered, read-only intent records plus derived lookups.
#[derive(Debug)]
pub struct IntentTable {
    records: Vec<IntentRecord>,
    /// Lower-cased patterns, parallel to `records`.
    lowered: Vec<Vec<String>>,
    /// Tag → index into `records`.
    by_tag: HashMap<String, usize>,
}

impl IntentTable {
    /// Validate records and build the table. Record order is preserved and
    /// is the match tie-break.
    pub fn new(records: Vec<IntentRecord>) -> Result<Self, IntentTableError> {
        if records.is_empty() {
            return Err(IntentTableError::Empty);
        }

        let mut by_tag = HashMap::with_capacity(records.len());
        let mut lowered = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if record.tag.trim().is_empty() {
                return Err(IntentTableError::EmptyTag { index });
            }
            if record.patterns.is_empty() {
                return Err(IntentTableError::NoPatterns(record.tag.clone()));
            }
            if let Some(position) = record.patterns.iter().position(|p| p.trim().is_empty()) {
                return Err(IntentTableError::EmptyPattern {
                    tag: record.tag.clone(),
                    position,
                });
            }
            if record.responses.is_empty() {
                return Err(IntentTableError::NoResponses(record.tag.clone()));
            }
            if by_tag.insert(record.tag.clone(), index).is_some() {
                return Err(IntentTableError::DuplicateTag(record.tag.clone()));
            }

            lowered.push(record.patterns.iter().map(|p| p.to_lowercase()).collect());
        }

        Ok(Self {
            records,
            lowered,
            by_tag,
        })
    }

    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, IntentTableError> {
        Self::from_json(BUILTIN_INTENTS)
    }

    /// Parse a JSON array of intent records.
    pub fn from_json(json: &str) -> Result<Self, IntentTableError> {
        let records: Vec<IntentRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load a JSON intent file.
    pub fn from_file(path: &Path) -> Result<Self, IntentTableError> {
        let contents = std::fs::read_to_string(path).map_err(|source| IntentTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Records in table order.
    pub fn records(&self) -> &[IntentRecord] {
        &self.records
    }

    /// Responses for a tag, in definition order.
    pub fn responses(&self, tag: &str) -> Option<&[String]> {
        self.by_tag
            .get(tag)
            .map(|&i| self.records[i].responses.as_slice())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn record(tag: &str, patterns: &[&str], responses: &[&str]) -> IntentRecord {
        IntentRecord {
            tag: tag.into(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            responses: responses.iter().map(|s| s.to_string()).collect(),
            context_set: None,
        }
    }

    #[test]
    fn builtin_table_loads() {
        let table = IntentTable::builtin().unwrap();
        assert_eq!(table.len(), 11);

        let tags: Vec<&str> = table.records().iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(
            tags,
            [
                "greeting",
                "goodbye",
                "chatbot",
                "about",
                "data_privacy",
                "cybersecurity",
                "adversarial_attacks",
                "model_robustness",
                "secure_development",
                "ethics_and_regulations",
                "incident_response",
            ]
        );
    }

    #[test]
    fn builtin_greeting_keeps_context_set() {
        let table = IntentTable::builtin().unwrap();
        assert_eq!(table.records()[0].context_set.as_deref(), Some(""));
        assert!(table.records()[1].context_set.is_none());
    }

    #[test]
    fn responses_by_tag() {
        let table = IntentTable::builtin().unwrap();
        let about = table.responses("about").unwrap();
        assert_eq!(about.len(), 2);
        assert!(about[1].contains("Shobit Gupta"));
        assert!(table.responses("weather").is_none());
    }

    #[test]
    fn empty_table_rejected() {
        assert!(matches!(
            IntentTable::new(vec![]),
            Err(IntentTableError::Empty)
        ));
    }

    #[test]
    fn no_responses_rejected() {
        let err = IntentTable::new(vec![record("greeting", &["hi"], &[])]).unwrap_err();
        assert!(matches!(err, IntentTableError::NoResponses(ref tag) if tag == "greeting"));
    }

    #[test]
    fn no_patterns_rejected() {
        let err = IntentTable::new(vec![record("greeting", &[], &["Hello"])]).unwrap_err();
        assert!(matches!(err, IntentTableError::NoPatterns(_)));
    }

    #[test]
    fn blank_pattern_rejected() {
        let err = IntentTable::new(vec![record("greeting", &["hi", "  "], &["Hello"])]).unwrap_err();
        assert!(matches!(
            err,
            IntentTableError::EmptyPattern { position: 1, .. }
        ));
    }

    #[test]
    fn blank_tag_rejected() {
        let err = IntentTable::new(vec![
            record("greeting", &["hi"], &["Hello"]),
            record("", &["bye"], &["Bye"]),
        ])
        .unwrap_err();
        assert!(matches!(err, IntentTableError::EmptyTag { index: 1 }));
    }

    #[test]
    fn duplicate_tag_rejected() {
        let err = IntentTable::new(vec![
            record("greeting", &["hi"], &["Hello"]),
            record("greeting", &["hey"], &["Hey"]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate intent tag 'greeting'"));
    }

    #[test]
    fn invalid_json_rejected() {
        let err = IntentTable::from_json(r#"[{"tag": "x"}]"#).unwrap_err();
        assert!(matches!(err, IntentTableError::Parse(_)));
    }

    #[test]
    fn missing_file_rejected() {
        let err = IntentTable::from_file(Path::new("/nonexistent/intents.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/intents.json"));
    }
}
