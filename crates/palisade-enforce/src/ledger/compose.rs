use std::collections::{BTreeMap, BTreeSet};

use globset::{Glob, GlobSet, GlobSetBuilder};
use palisade_core::types::Rule;

/// The merged view of every todo and enablement file for one rule.
#[derive(Debug, Clone, Default)]
pub struct RuleView {
    pub exclude: BTreeSet<String>,
    /// `<package dir>/**/*` for every package enabling the rule.
    pub include: Vec<String>,
    include_set: Option<GlobSet>,
}

impl RuleView {
    pub fn is_excluded(&self, file: &str) -> bool {
        self.exclude.contains(file)
    }

    /// A rule with no include globs applies everywhere.
    pub fn applies_to(&self, file: &str) -> bool {
        match &self.include_set {
            Some(set) => set.is_match(file),
            None => true,
        }
    }

    fn compile(&mut self) {
        if self.include.is_empty() {
            self.include_set = None;
            return;
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.include {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => tracing::warn!(pattern = %pattern, error = %e, "invalid include glob"),
            }
        }
        self.include_set = match builder.build() {
            Ok(set) => Some(set),
            Err(e) => {
                tracing::warn!(error = %e, "failed to build include globs");
                None
            }
        };
    }
}

/// Rule name -> merged configuration.
#[derive(Debug, Clone, Default)]
pub struct ComposedRules {
    rules: BTreeMap<Rule, RuleView>,
}

impl ComposedRules {
    pub fn add_exclusions(&mut self, rule: Rule, files: impl IntoIterator<Item = String>) {
        self.rules.entry(rule).or_default().exclude.extend(files);
    }

    pub fn add_include(&mut self, rule: Rule, package_prefix: &str) {
        let pattern = if package_prefix.is_empty() {
            "**/*".to_string()
        } else {
            format!("{package_prefix}**/*")
        };
        self.rules.entry(rule).or_default().include.push(pattern);
    }

    /// Compile include globs. Call once after all entries are added.
    pub fn finish(mut self) -> Self {
        for view in self.rules.values_mut() {
            view.compile();
        }
        self
    }

    pub fn get(&self, rule: Rule) -> Option<&RuleView> {
        self.rules.get(&rule)
    }

    pub fn is_excluded(&self, rule: Rule, file: &str) -> bool {
        self.get(rule).is_some_and(|v| v.is_excluded(file))
    }

    pub fn applies_to(&self, rule: Rule, file: &str) -> bool {
        self.get(rule).map_or(true, |v| v.applies_to(file))
    }
}
