use palisade_core::config::PackLevelConfig;
use palisade_core::store::PackageIndex;
use palisade_core::types::{Package, Rule};
use serde_yaml::Value;

use super::files::{LedgerFile, ENABLED_KEY, EXCLUDE_KEY, FAILURE_MODE_KEY, INHERIT_KEY};
use super::{SuppressionLedger, ENABLEMENT_FILE, TODO_FILE};

impl SuppressionLedger {
    /// Check hand-edited todo and enablement files. Problems are returned as
    /// messages; nothing here fails.
    pub fn validate(&self, index: &PackageIndex, pack_level: &PackLevelConfig) -> Vec<String> {
        let mut errors = self.unparsable().to_vec();
        for package in index.all().iter().filter(|p| !p.is_root()) {
            if let Some(todo) = self.todo_for(&package.name) {
                errors.extend(validate_todo(todo, package, index, pack_level));
            }
            if let Some(enablement) = self.enablement_for(&package.name) {
                errors.extend(validate_enablement(enablement, pack_level));
                errors.extend(self.validate_strict(enablement, package, index, pack_level));
            }
        }
        errors
    }

    fn validate_strict(
        &self,
        enablement: &LedgerFile,
        package: &Package,
        index: &PackageIndex,
        pack_level: &PackLevelConfig,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        for rule in &pack_level.permitted_rules {
            if !enablement.is_strict(*rule) {
                continue;
            }
            let offending: Vec<String> = self
                .exclusions_for_rule(*rule)
                .into_iter()
                .filter(|path| belongs_to(index, path, package))
                .map(|path| format!("`{path}`"))
                .collect();
            if offending.is_empty() {
                continue;
            }
            errors.push(format!(
                "{} has set `{}` to `FailureMode: strict` in `{}`, forbidding new exceptions. Please either remove {} from the top-level and pack-specific `{}` files or remove `FailureMode: strict`.",
                package.name,
                rule,
                enablement.path,
                offending.join(", "),
                TODO_FILE
            ));
        }
        errors
    }
}

fn validate_todo(
    todo: &LedgerFile,
    package: &Package,
    index: &PackageIndex,
    pack_level: &PackLevelConfig,
) -> Vec<String> {
    let mut errors = Vec::new();
    for (key, config) in &todo.entries {
        if !is_permitted(key, pack_level) {
            errors.push(disallowed_rule(&todo.path, key, pack_level, TODO_FILE));
            continue;
        }
        let excludes = match config_keys(config).as_deref() {
            Some([only]) if only == EXCLUDE_KEY => config.get(EXCLUDE_KEY).and_then(Value::as_sequence),
            _ => None,
        };
        let Some(excludes) = excludes else {
            errors.push(format!(
                "{} contains invalid configuration for {key}.\nPlease ensure the only configuration for {key} is `{EXCLUDE_KEY}`",
                todo.path
            ));
            continue;
        };
        for path in excludes.iter().filter_map(Value::as_str) {
            if belongs_to(index, path, package) {
                continue;
            }
            errors.push(format!(
                "{} contains invalid configuration for {key}.\n{path} does not belong to {}. Please ensure you only add exclusions\nfor files within this pack.",
                todo.path, package.name
            ));
        }
    }
    errors
}

fn validate_enablement(enablement: &LedgerFile, pack_level: &PackLevelConfig) -> Vec<String> {
    let mut errors = Vec::new();
    for rule in &pack_level.required_rules {
        if !enablement.entries.contains_key(rule.as_str()) {
            errors.push(format!(
                "{} is missing configuration for {rule}.",
                enablement.path
            ));
        }
    }
    for (key, config) in &enablement.entries {
        if key == INHERIT_KEY {
            continue;
        }
        if !is_permitted(key, pack_level) {
            errors.push(disallowed_rule(&enablement.path, key, pack_level, ENABLEMENT_FILE));
            continue;
        }
        let well_formed = config_keys(config).is_some_and(|keys| {
            keys.iter()
                .all(|k| k == ENABLED_KEY || k == FAILURE_MODE_KEY)
        });
        if !well_formed {
            errors.push(format!(
                "{} contains invalid configuration for {key}.\nPlease ensure the only configuration for {key} is `{ENABLED_KEY}` and `{FAILURE_MODE_KEY}`",
                enablement.path
            ));
        }
    }
    errors
}

fn is_permitted(key: &str, pack_level: &PackLevelConfig) -> bool {
    key.parse::<Rule>()
        .is_ok_and(|rule| pack_level.is_permitted(rule))
}

fn disallowed_rule(path: &str, key: &str, pack_level: &PackLevelConfig, top_level: &str) -> String {
    let permitted: Vec<&str> = pack_level.permitted_rules.iter().map(Rule::as_str).collect();
    format!(
        "{path} contains invalid configuration for {key}.\nPlease only configure the following rules on a per-pack basis: {permitted:?}\nFor ignoring other rules, please instead modify the top-level {top_level} file."
    )
}

/// String keys of a mapping, or `None` when `config` is not a mapping.
fn config_keys(config: &Value) -> Option<Vec<String>> {
    config.as_mapping().map(|mapping| {
        mapping
            .iter()
            .map(|(k, _)| k.as_str().map(str::to_string).unwrap_or_default())
            .collect()
    })
}

fn belongs_to(index: &PackageIndex, path: &str, package: &Package) -> bool {
    index
        .owner_of(path)
        .is_some_and(|owner| owner.name == package.name)
}
