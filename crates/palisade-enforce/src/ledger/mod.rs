//! The incremental-suppression ledger.
//!
//! Each package may carry a `package_palisade_todo.yml` listing files whose
//! existing violations of a rule are tolerated, and a `package_palisade.yml`
//! turning rules on for the package (optionally in strict mode, which forbids
//! todo entries). A todo file at the repository root applies across packages.
//! A packwerk `package_todo.yml` is honoured per constant by the dependency
//! and privacy checks.

mod compose;
mod files;
mod packwerk;
mod validate;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use palisade_core::store::PackageIndex;
use palisade_core::types::Rule;

use crate::error::EnforceError;
use crate::types::Violation;

pub use compose::{ComposedRules, RuleView};
pub use files::{
    delete_todo, enablement_path, todo_path, write_default_enablement, write_todo, LedgerFile,
    ENABLEMENT_FILE, INHERIT_KEY, PACKWERK_TODO_FILE, TODO_FILE,
};
pub use packwerk::{PackwerkEntry, PackwerkTodo};

#[derive(Debug, Clone, Default)]
pub struct SuppressionLedger {
    root_todo: Option<LedgerFile>,
    /// package name -> todo file
    todos: BTreeMap<String, LedgerFile>,
    /// package name -> enablement file
    enablements: BTreeMap<String, LedgerFile>,
    /// referencing package name -> packwerk todo
    packwerk: BTreeMap<String, PackwerkTodo>,
    /// Files skipped because they are not valid YAML, as `validate` messages.
    unparsable: Vec<String>,
    composed: ComposedRules,
}

impl SuppressionLedger {
    /// Read every ledger file belonging to a package in `index`.
    pub fn load(root: &Path, index: &PackageIndex) -> Result<Self, EnforceError> {
        let mut ledger = Self::default();
        ledger.root_todo = ledger.tolerate(LedgerFile::load(root, TODO_FILE))?;
        for package in index.all() {
            let packwerk = PackwerkTodo::load(root, &package.join(PACKWERK_TODO_FILE));
            if let Some(todo) = ledger.tolerate(packwerk)? {
                ledger.packwerk.insert(package.name.clone(), todo);
            }
            if package.is_root() {
                continue;
            }
            if let Some(todo) = ledger.tolerate(LedgerFile::load(root, &todo_path(package)))? {
                ledger.todos.insert(package.name.clone(), todo);
            }
            let enablement = LedgerFile::load(root, &enablement_path(package));
            if let Some(enablement) = ledger.tolerate(enablement)? {
                ledger.enablements.insert(package.name.clone(), enablement);
            }
        }
        ledger.composed = ledger.compose(index);
        tracing::debug!(
            todos = ledger.todos.len(),
            enablements = ledger.enablements.len(),
            packwerk = ledger.packwerk.len(),
            unparsable = ledger.unparsable.len(),
            "loaded suppression ledger"
        );
        Ok(ledger)
    }

    /// Skip a file that is not valid YAML and remember it for `validate`.
    /// I/O failures still abort.
    fn tolerate<T>(
        &mut self,
        loaded: Result<Option<T>, EnforceError>,
    ) -> Result<Option<T>, EnforceError> {
        match loaded {
            Err(EnforceError::Yaml { path, source }) => {
                tracing::warn!(path = %path, error = %source, "skipping unparsable ledger file");
                self.unparsable
                    .push(format!("{path} could not be parsed as YAML: {source}"));
                Ok(None)
            }
            other => other,
        }
    }

    /// Messages for ledger files that were skipped as unparsable.
    pub fn unparsable(&self) -> &[String] {
        &self.unparsable
    }

    /// Merge root and package files into one view per rule: exclusions
    /// concatenate; `Enabled: true` adds the package's directory glob to the
    /// rule's include list.
    pub fn compose(&self, index: &PackageIndex) -> ComposedRules {
        let mut rules = ComposedRules::default();
        for file in self.todo_files() {
            for (rule, _) in file.rules() {
                rules.add_exclusions(rule, file.exclusions(rule));
            }
        }
        for (name, enablement) in &self.enablements {
            let Some(package) = index.find(name) else {
                continue;
            };
            for (rule, _) in enablement.rules() {
                if enablement.is_enabled(rule) {
                    rules.add_include(rule, &package.path_prefix());
                }
            }
        }
        rules.finish()
    }

    pub fn todo_for(&self, package: &str) -> Option<&LedgerFile> {
        self.todos.get(package)
    }

    pub fn enablement_for(&self, package: &str) -> Option<&LedgerFile> {
        self.enablements.get(package)
    }

    pub fn is_excluded(&self, rule: Rule, file: &str) -> bool {
        self.composed.is_excluded(rule, file)
    }

    pub fn applies_to(&self, rule: Rule, file: &str) -> bool {
        self.composed.applies_to(rule, file)
    }

    /// Whether `referencing_package`'s packwerk todo already records a `rule`
    /// violation for `constant`.
    pub fn in_packwerk_todo(&self, referencing_package: &str, constant: &str, rule: Rule) -> bool {
        self.packwerk
            .get(referencing_package)
            .is_some_and(|todo| todo.lists(constant, rule))
    }

    /// Union of `rule` exclusions across the root and every package todo file.
    pub fn exclusions_for_rule(&self, rule: Rule) -> BTreeSet<String> {
        self.todo_files()
            .flat_map(|file| file.exclusions(rule))
            .collect()
    }

    /// Mark `violation` suppressed when its file is excluded for its rule.
    pub fn apply(&self, mut violation: Violation) -> Violation {
        if self.is_excluded(violation.rule, &violation.file) {
            violation.suppress_hint = Some(format!(
                "Excluded from {} in a {} file",
                violation.rule, TODO_FILE
            ));
            violation.suppressed = true;
            violation.severity = "INFO".to_string();
        }
        violation
    }

    fn todo_files(&self) -> impl Iterator<Item = &LedgerFile> {
        self.root_todo.iter().chain(self.todos.values())
    }
}
