//! B005: methods defined under a package's public directory must be class
//! methods (`def self.name`, or a `def` inside `class << self`).
//!
//! Instance methods are allowed in classes whose superclass is listed in
//! `public_api.acceptable_parent_classes` (value objects such as
//! `T::Struct`) and in modules declaring `interface!`.

use palisade_core::config::PublicApiConfig;
use palisade_core::types::{Package, Rule};
use palisade_parsers::ruby::{MethodDef, ParsedFile};

use crate::types::Violation;

pub fn check_class_methods_as_public_apis(
    file: &ParsedFile,
    owner: &Package,
    public_path: &str,
    config: &PublicApiConfig,
) -> Vec<Violation> {
    if !owner.is_public_path(&file.path, public_path) {
        return Vec::new();
    }
    file.methods()
        .filter(|method| !is_permitted(method, config))
        .map(|method| {
            Violation::new(
                Rule::ClassMethodsAsPublicApis,
                &file.path,
                method.line,
                method.column,
                format!(
                    "Public API method must be a class method (e.g. `self.{}(...)`)",
                    method.name
                ),
            )
            .with_fix_hint(format!("Define it as `def self.{}`", method.name))
        })
        .collect()
}

fn is_permitted(method: &MethodDef, config: &PublicApiConfig) -> bool {
    if method.singleton || method.in_interface {
        return true;
    }
    method.enclosing_superclass.as_deref().is_some_and(|parent| {
        let parent = parent.trim_start_matches("::");
        config
            .acceptable_parent_classes
            .iter()
            .any(|accepted| accepted.trim_start_matches("::") == parent)
    })
}
