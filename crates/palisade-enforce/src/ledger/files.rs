//! On-disk shapes of the todo and enablement files.
//!
//! Both are loaded as loosely typed rule tables so that `validate` can report
//! shape problems instead of failing to deserialize.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use palisade_core::types::{Package, Rule};
use serde::Serialize;
use serde_yaml::Value;

use crate::error::EnforceError;

pub const TODO_FILE: &str = "package_palisade_todo.yml";
pub const ENABLEMENT_FILE: &str = "package_palisade.yml";
pub const PACKWERK_TODO_FILE: &str = "package_todo.yml";

pub const EXCLUDE_KEY: &str = "Exclude";
pub const ENABLED_KEY: &str = "Enabled";
pub const FAILURE_MODE_KEY: &str = "FailureMode";
pub const INHERIT_KEY: &str = "inherit_from";

/// Rule key -> rule configuration, as read from one YAML file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerFile {
    /// Repo-relative.
    pub path: String,
    pub entries: BTreeMap<String, Value>,
}

impl LedgerFile {
    /// Read `root/rel`, or `None` when it does not exist.
    pub fn load(root: &Path, rel: &str) -> Result<Option<Self>, EnforceError> {
        let abs = root.join(rel);
        if !abs.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&abs).map_err(|e| EnforceError::io(rel, e))?;
        Self::parse(rel, &content).map(Some)
    }

    pub fn parse(rel: &str, content: &str) -> Result<Self, EnforceError> {
        if is_blank(content) {
            return Ok(Self {
                path: rel.to_string(),
                entries: BTreeMap::new(),
            });
        }
        let entries: Option<BTreeMap<String, Value>> =
            serde_yaml::from_str(content).map_err(|source| EnforceError::Yaml {
                path: rel.to_string(),
                source,
            })?;
        Ok(Self {
            path: rel.to_string(),
            entries: entries.unwrap_or_default(),
        })
    }

    /// Keys that name a known rule, with their configuration.
    pub fn rules(&self) -> impl Iterator<Item = (Rule, &Value)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| k.parse::<Rule>().ok().map(|r| (r, v)))
    }

    pub fn get(&self, rule: Rule) -> Option<&Value> {
        self.entries.get(rule.as_str())
    }

    /// String items of `rule.Exclude`; anything else is ignored.
    pub fn exclusions(&self, rule: Rule) -> Vec<String> {
        self.get(rule)
            .and_then(|v| v.get(EXCLUDE_KEY))
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_enabled(&self, rule: Rule) -> bool {
        self.get(rule)
            .and_then(|v| v.get(ENABLED_KEY))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn is_strict(&self, rule: Rule) -> bool {
        self.get(rule)
            .and_then(|v| v.get(FAILURE_MODE_KEY))
            .and_then(Value::as_str)
            == Some("strict")
    }
}

/// True for content with nothing but whitespace and comments.
pub(crate) fn is_blank(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|l| l.is_empty() || l.starts_with('#') || l == "---")
}

#[derive(Serialize)]
struct TodoEntry<'a> {
    #[serde(rename = "Exclude")]
    exclude: &'a BTreeSet<String>,
}

#[derive(Serialize)]
struct EnablementEntry {
    #[serde(rename = "Enabled")]
    enabled: bool,
}

pub fn todo_path(package: &Package) -> String {
    package.join(TODO_FILE)
}

pub fn enablement_path(package: &Package) -> String {
    package.join(ENABLEMENT_FILE)
}

/// Replace `package`'s todo file with `entries`. Nothing is written when
/// `entries` holds no exclusions; returns the written path otherwise.
pub fn write_todo(
    root: &Path,
    package: &Package,
    entries: &BTreeMap<Rule, BTreeSet<String>>,
) -> Result<Option<String>, EnforceError> {
    delete_todo(root, package)?;
    let table: BTreeMap<&str, TodoEntry<'_>> = entries
        .iter()
        .filter(|(_, files)| !files.is_empty())
        .map(|(rule, files)| (rule.as_str(), TodoEntry { exclude: files }))
        .collect();
    if table.is_empty() {
        return Ok(None);
    }

    let rel = todo_path(package);
    let yaml = serde_yaml::to_string(&table).map_err(|source| EnforceError::Yaml {
        path: rel.clone(),
        source,
    })?;
    std::fs::write(root.join(&rel), yaml).map_err(|e| EnforceError::io(&rel, e))?;
    Ok(Some(rel))
}

/// Remove `package`'s todo file. Returns whether one existed.
pub fn delete_todo(root: &Path, package: &Package) -> Result<bool, EnforceError> {
    let rel = todo_path(package);
    match std::fs::remove_file(root.join(&rel)) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(EnforceError::io(rel, e)),
    }
}

/// Write an enablement file turning on every rule in `required`, one blank
/// line between rules.
pub fn write_default_enablement(
    root: &Path,
    package: &Package,
    required: &[Rule],
) -> Result<String, EnforceError> {
    let rel = enablement_path(package);
    let mut out = String::new();
    for rule in required {
        let mut table = BTreeMap::new();
        table.insert(rule.as_str(), EnablementEntry { enabled: true });
        let chunk = serde_yaml::to_string(&table).map_err(|source| EnforceError::Yaml {
            path: rel.clone(),
            source,
        })?;
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&chunk);
    }
    std::fs::write(root.join(&rel), out).map_err(|e| EnforceError::io(&rel, e))?;
    Ok(rel)
}
