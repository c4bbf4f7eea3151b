//! Dependency (B001) and privacy (B002) checks for one resolved reference.

use palisade_core::types::{Package, Rule};
use palisade_parsers::ruby::ConstantRef;

use crate::ledger::SuppressionLedger;
use crate::types::{ConstantReference, Violation};

/// Whether a reference site should be resolved at all: partial references
/// (`Foo` in `Foo::Bar`) and names containing an exempt substring are skipped.
pub fn should_resolve(site: &ConstantRef, exempt_substrings: &[String]) -> bool {
    !site.is_partial()
        && !exempt_substrings
            .iter()
            .any(|s| !s.is_empty() && site.name.contains(s.as_str()))
}

/// B001: `referencing` uses a constant from a package it does not depend on.
pub fn check_dependency(
    reference: &ConstantReference,
    referencing: &Package,
    site: &ConstantRef,
    ledger: &SuppressionLedger,
) -> Option<Violation> {
    let defining = &reference.defining_package;
    if defining.name == referencing.name
        || referencing.depends_on(&defining.name)
        || !referencing.enforces_dependencies
        || ledger.in_packwerk_todo(&referencing.name, &reference.identifier, Rule::Dependency)
    {
        return None;
    }

    Some(
        Violation::new(
            Rule::Dependency,
            &reference.referencing_path,
            site.line,
            site.column,
            format!(
                "Dependency violation: `{}` belongs to `{}`, which `{}` does not declare as a dependency",
                reference.identifier, defining.name, referencing.name
            ),
        )
        .with_constant(&reference.identifier)
        .with_fix_hint(format!(
            "Add `{}` to the dependencies in {}",
            defining.name,
            referencing.join("package.yml")
        )),
    )
}

/// B002: a constant outside the defining package's public directory is used
/// from another package.
pub fn check_privacy(
    reference: &ConstantReference,
    referencing: &Package,
    site: &ConstantRef,
    ledger: &SuppressionLedger,
    default_public_path: &str,
) -> Option<Violation> {
    let defining = &reference.defining_package;
    if defining.name == referencing.name
        || reference.is_public
        || !defining.enforces_privacy
        || ledger.in_packwerk_todo(&referencing.name, &reference.identifier, Rule::Privacy)
    {
        return None;
    }

    Some(
        Violation::new(
            Rule::Privacy,
            &reference.referencing_path,
            site.line,
            site.column,
            format!(
                "Privacy violation: `{}` is private to `{}` (defined in {})",
                reference.identifier, defining.name, reference.definition_path
            ),
        )
        .with_constant(&reference.identifier)
        .with_fix_hint(format!(
            "Use a public API from {} or move the definition there",
            defining.public_dir(default_public_path)
        )),
    )
}
