use std::collections::BTreeMap;
use std::path::Path;

use palisade_core::types::Rule;
use serde::Deserialize;

use super::files::is_blank;
use crate::error::EnforceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackwerkEntry {
    #[serde(default)]
    pub violations: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// A packwerk `package_todo.yml`: defining package -> `::Constant` -> entry.
#[derive(Debug, Clone, Default)]
pub struct PackwerkTodo {
    entries: BTreeMap<String, BTreeMap<String, PackwerkEntry>>,
}

impl PackwerkTodo {
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
            return Ok(Self::default());
        }
        let entries: Option<BTreeMap<String, BTreeMap<String, PackwerkEntry>>> =
            serde_yaml::from_str(content).map_err(|source| EnforceError::Yaml {
                path: rel.to_string(),
                source,
            })?;
        Ok(Self {
            entries: entries.unwrap_or_default(),
        })
    }

    /// Whether `constant` is recorded with a `rule` violation under any
    /// defining package.
    pub fn lists(&self, constant: &str, rule: Rule) -> bool {
        let key = format!("::{}", constant.trim_start_matches("::"));
        self.entries
            .values()
            .filter_map(|constants| constants.get(&key))
            .any(|entry| entry.violations.iter().any(|v| v == rule.as_str()))
    }
}
