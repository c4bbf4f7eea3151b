//! B004: every constant a file defines must be loadable from that file's path.
//!
//! Each leaf definition is "anchored" where a suffix of the camelized path
//! equals a prefix of its nesting:
//!
//! ```text
//! packs/apples/app/services/apples/tool.rb
//!   module Apples; class Tool; end; end   -> nesting [Apples, Tool], anchor 2
//! ```
//!
//! A leaf with no anchor is misplaced. Leaves whose anchors share nothing
//! cannot all be loaded from the same file.

use std::collections::BTreeSet;

use palisade_core::types::Rule;
use palisade_parsers::ruby::{Definition, DefinitionKind, ParsedFile};

use crate::path_convention::PathConvention;
use crate::types::Violation;

pub const MODULE_MESSAGE: &str = "Module name does not match filename.";
pub const CLASS_MESSAGE: &str = "Class name does not match filename.";
pub const CONSTANT_MESSAGE: &str = "Constant name does not match filename.";
pub const INCOMPATIBLE_MESSAGE: &str = "Constant names are mutually incompatible with file path.";

pub fn check_constant_filename(file: &ParsedFile, convention: &PathConvention) -> Vec<Violation> {
    let extension = format!(".{}", convention.extension());
    let stem = file.path.strip_suffix(&extension).unwrap_or(&file.path);
    let path_segments: Vec<String> = stem.split('/').map(|s| convention.camelize(s)).collect();

    let mut violations = Vec::new();
    let mut common: Option<BTreeSet<usize>> = None;
    for (index, leaf) in file.leaf_definitions() {
        let constants = nesting_constants(file, index);
        let anchors = anchors(&path_segments, &constants);

        if anchors.is_empty() {
            violations.push(violation(file, leaf, mismatch_message(leaf.kind)));
            continue;
        }
        let shared: BTreeSet<usize> = match common.take() {
            Some(previous) => previous.intersection(&anchors).copied().collect(),
            None => anchors,
        };
        if shared.is_empty() {
            violations.push(violation(file, leaf, INCOMPATIBLE_MESSAGE));
        }
        common = Some(shared);
    }
    violations
}

fn mismatch_message(kind: DefinitionKind) -> &'static str {
    match kind {
        DefinitionKind::Module => MODULE_MESSAGE,
        DefinitionKind::Class => CLASS_MESSAGE,
        DefinitionKind::Constant => CONSTANT_MESSAGE,
    }
}

fn violation(file: &ParsedFile, leaf: &Definition, message: &str) -> Violation {
    Violation::new(
        Rule::ConstantFilename,
        &file.path,
        leaf.line,
        leaf.column,
        message.to_string(),
    )
    .with_constant(&leaf.qualified_name)
}

/// Flattened constant names from the outermost definition down to `index`.
fn nesting_constants(file: &ParsedFile, index: usize) -> Vec<String> {
    file.nesting(index)
        .into_iter()
        .flat_map(|def| match def.kind {
            DefinitionKind::Constant => {
                let own = def.name.rsplit("::").next().unwrap_or(&def.name);
                vec![screaming_to_camel(own)]
            }
            _ => def
                .name
                .trim_start_matches("::")
                .split("::")
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// Every `i` such that the last `i` path segments equal the first `i`
/// nesting constants.
fn anchors(path_segments: &[String], constants: &[String]) -> BTreeSet<usize> {
    (1..=constants.len())
        .filter(|&i| i <= path_segments.len())
        .filter(|&i| path_segments[path_segments.len() - i..] == constants[..i])
        .collect()
}

/// `FOO_BAR` -> `FooBar`; other names are returned unchanged.
fn screaming_to_camel(name: &str) -> String {
    let screaming = !name.is_empty() && name.chars().all(|c| c.is_uppercase() || c == '_');
    if !screaming {
        return name.to_string();
    }
    name.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}
