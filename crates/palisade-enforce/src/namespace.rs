use std::collections::{BTreeMap, BTreeSet};

use palisade_core::config::NamespaceConfig;
use palisade_core::store::PackageIndex;
use palisade_core::types::{Package, Rule};

use crate::path_convention::PathConvention;
use crate::types::{NamespaceContext, Violation};

/// Checks that a file's namespace, as implied by its path, belongs to the
/// package that owns it.
///
/// Only packages listed in `include_packs` are held to their own namespace.
/// Other packages are flagged only when they sit in a namespace that an
/// opted-in package has reserved.
#[derive(Debug, Clone)]
pub struct NamespaceConventionChecker {
    convention: PathConvention,
    include_packs: BTreeSet<String>,
    globally_permitted: BTreeSet<String>,
    /// namespace -> reserving package
    reserved: BTreeMap<String, String>,
}

impl NamespaceConventionChecker {
    pub fn new(config: &NamespaceConfig, convention: PathConvention, index: &PackageIndex) -> Self {
        let include_packs: BTreeSet<String> = config.include_packs.iter().cloned().collect();
        let reserved = include_packs
            .iter()
            .filter_map(|name| index.find(name))
            .filter(|p| !p.is_root())
            .map(|p| (convention.package_namespace(p), p.name.clone()))
            .collect();
        Self {
            convention,
            include_packs,
            globally_permitted: config.globally_permitted.iter().cloned().collect(),
            reserved,
        }
    }

    /// The package reserving `namespace`, if any.
    pub fn reserved_by(&self, namespace: &str) -> Option<&str> {
        self.reserved.get(namespace).map(String::as_str)
    }

    /// Where `path` sits versus where `package` expects it. `None` when the
    /// path is outside the package's source roots.
    pub fn context(&self, path: &str, package: &Package) -> Option<NamespaceContext> {
        let location = self.convention.locate(path, package)?;
        let segments: Vec<String> = location
            .segments
            .iter()
            .map(|s| self.convention.camelize(s))
            .collect();
        let actual_namespace = segments.first()?.clone();
        Some(NamespaceContext {
            actual_fully_qualified_name: segments.join("::"),
            expected_file_path: self.convention.expected_path(
                &segments,
                package,
                &location.source_root,
                &location.autoload_dir,
            ),
            expected_namespace: self.convention.package_namespace(package),
            actual_namespace,
        })
    }

    pub fn check(&self, path: &str, package: &Package) -> Option<Violation> {
        if package.is_root() || package.uses_automatic_namespace() {
            return None;
        }
        let ctx = self.context(path, package)?;
        if ctx.actual_namespace == ctx.expected_namespace
            || self.globally_permitted.contains(&ctx.actual_namespace)
        {
            return None;
        }

        let message = if self.include_packs.contains(&package.name) {
            format!(
                "Based on the filepath, this file defines `{}`, but it should be namespaced as `{}::{}` with path `{}`.",
                ctx.actual_fully_qualified_name,
                ctx.expected_namespace,
                ctx.actual_fully_qualified_name,
                ctx.expected_file_path
            )
        } else {
            let owner = self
                .reserved_by(&ctx.actual_namespace)
                .filter(|owner| *owner != package.name)?;
            format!(
                "Based on the filepath, this file defines `{}`. `{}` prevents other packs from sitting in the `{}` namespace. This should be namespaced under `{}` with path `{}`.",
                ctx.actual_fully_qualified_name,
                owner,
                ctx.actual_namespace,
                ctx.expected_namespace,
                ctx.expected_file_path
            )
        };

        Some(
            Violation::new(Rule::NamespaceConvention, path, 1, 0, message)
                .with_constant(&ctx.actual_fully_qualified_name)
                .with_fix_hint(format!("Move this file to {}", ctx.expected_file_path)),
        )
    }
}
