//! Placeholder substitution for templates.
//!
//! Each data entry is tried under two spellings, `{{key}}` and `{{ key }}`.
//! Replacements are best effort: a failure for one placeholder is counted
//! and the run carries on with the rest.

use crate::session::DocumentSession;
use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Ordered key/value data. Re-inserting a key keeps its first position.
pub type DataMapping = IndexMap<String, String>;

/// The two accepted spellings of a placeholder, tight form first.
pub fn placeholder_patterns(key: &str) -> [String; 2] {
    [format!("{{{{{}}}}}", key), format!("{{{{ {} }}}}", key)]
}

/// Every (pattern, replacement) pair for a mapping, in application order.
pub fn substitution_pairs(mapping: &DataMapping) -> Vec<(String, String)> {
    mapping
        .iter()
        .flat_map(|(key, value)| {
            placeholder_patterns(key)
                .into_iter()
                .map(move |pattern| (pattern, value.clone()))
        })
        .collect()
}

/// Counters for one substitution run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplacementOutcome {
    /// Patterns handed to the session
    pub attempted: usize,
    /// Patterns the session accepted
    pub applied: usize,
    /// Patterns the session refused
    pub failed: usize,
    /// Matches the session reported across all applied patterns
    pub occurrences: usize,
}

/// Apply every substitution pair to the session.
///
/// Session errors are logged and counted in `failed`; they never stop the run.
pub fn apply_substitutions(
    session: &mut dyn DocumentSession,
    mapping: &DataMapping,
) -> ReplacementOutcome {
    let mut outcome = ReplacementOutcome::default();
    for (pattern, value) in substitution_pairs(mapping) {
        outcome.attempted += 1;
        match session.find_and_replace_all(&pattern, &value) {
            Ok(found) => {
                outcome.applied += 1;
                outcome.occurrences += found;
                log::info!("Replaced: {} -> {} ({} found)", pattern, value, found);
            }
            Err(e) => {
                outcome.failed += 1;
                log::warn!("Could not replace {}: {}", pattern, e);
            }
        }
    }
    if outcome.attempted > 0 && outcome.occurrences == 0 {
        log::warn!("No placeholders were found in the document");
    }
    outcome
}

/// Parse `key:value` tokens. Tokens without a colon are returned separately.
pub fn parse_data_args<S: AsRef<str>>(tokens: &[S]) -> (DataMapping, Vec<String>) {
    let mut mapping = DataMapping::new();
    let mut rejected = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        match token.split_once(':') {
            Some((key, value)) => {
                mapping.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                log::warn!("Invalid data format: {} (use key:value)", token);
                rejected.push(token.to_string());
            }
        }
    }
    (mapping, rejected)
}

/// Text written into the document for a JSON value
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Load a JSON object file as a data mapping, keeping key order.
pub fn load_json_mapping(path: &Path) -> Result<DataMapping> {
    if !path.exists() {
        bail!("JSON file not found: {}", path.display());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read JSON file {}", path.display()))?;
    let object: IndexMap<String, Value> = serde_json::from_str(&content).with_context(|| {
        format!("JSON data in {} must be an object of key/value pairs", path.display())
    })?;
    Ok(object
        .iter()
        .map(|(key, value)| (key.clone(), render_value(value)))
        .collect())
}

/// Merge data sources in order; later sources win on key collisions.
pub fn merge_mappings(sources: impl IntoIterator<Item = DataMapping>) -> DataMapping {
    let mut merged = DataMapping::new();
    for source in sources {
        merged.extend(source);
    }
    merged
}
