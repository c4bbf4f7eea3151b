//! Constant-to-package resolution by path convention.
//!
//! `Apples::Tools::Pruners` is looked up in every package named `*/apples`, at
//! `<package>/<source root>/<any dir>/apples/tools/pruners.rb`. No symbol table
//! is built; a constant that does not follow the convention simply resolves to
//! nothing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use palisade_core::store::PackageIndex;
use palisade_core::types::Package;

use crate::error::EnforceError;
use crate::path_convention::PathConvention;
use crate::types::ConstantReference;

#[derive(Debug, Clone)]
struct Resolved {
    package: String,
    definition_path: String,
}

pub struct ConstantResolver {
    root: PathBuf,
    convention: PathConvention,
    default_public_path: String,
    cache: HashMap<String, Option<Resolved>>,
}

impl ConstantResolver {
    pub fn new(root: &Path, convention: PathConvention, default_public_path: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            convention,
            default_public_path: default_public_path.to_string(),
            cache: HashMap::new(),
        }
    }

    /// Resolve `identifier` as used in `referencing_path`.
    ///
    /// `Ok(None)` is a soft miss: no package claims the root namespace, or the
    /// claiming package has no file at the conventional location. Two or more
    /// files claiming the constant is [`EnforceError::AmbiguousConstant`].
    pub fn resolve(
        &mut self,
        index: &PackageIndex,
        identifier: &str,
        referencing_path: &str,
    ) -> Result<Option<ConstantReference>, EnforceError> {
        let identifier = identifier.trim_start_matches("::");
        let resolved = match self.cache.get(identifier) {
            Some(hit) => hit.clone(),
            None => {
                let found = self.locate(index, identifier)?;
                self.cache.insert(identifier.to_string(), found.clone());
                found
            }
        };
        let Some(resolved) = resolved else {
            return Ok(None);
        };
        let Some(package) = index.find(&resolved.package) else {
            return Ok(None);
        };

        Ok(Some(ConstantReference {
            identifier: identifier.to_string(),
            root_namespace: identifier.split("::").next().unwrap_or(identifier).to_string(),
            is_public: package.is_public_path(&resolved.definition_path, &self.default_public_path),
            defining_package: package.clone(),
            definition_path: resolved.definition_path,
            referencing_path: referencing_path.to_string(),
        }))
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn bust_cache(&mut self) {
        self.cache.clear();
    }

    fn locate(&self, index: &PackageIndex, identifier: &str) -> Result<Option<Resolved>, EnforceError> {
        let mut segments = identifier.split("::");
        let Some(first) = segments.next().filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let suffix = self.convention.underscore(first);
        let rest: Vec<String> = segments.map(|s| self.convention.underscore(s)).collect();
        let tail = if rest.is_empty() {
            format!("{}.{}", suffix, self.convention.extension())
        } else {
            format!("{}/{}.{}", suffix, rest.join("/"), self.convention.extension())
        };

        let mut matches = Vec::new();
        for package in index.ending_with(&suffix) {
            for autoload in self.autoload_dirs(package)? {
                let candidate = format!("{autoload}/{tail}");
                if self.root.join(&candidate).is_file() {
                    matches.push((package, candidate));
                }
            }
        }

        match matches.len() {
            0 => {
                tracing::debug!(constant = identifier, "no conventional definition found");
                Ok(None)
            }
            1 => {
                let (candidate_package, path) = matches.remove(0);
                let owner = index
                    .owner_of(&path)
                    .filter(|p| !p.is_root())
                    .unwrap_or(candidate_package);
                Ok(Some(Resolved {
                    package: owner.name.clone(),
                    definition_path: path,
                }))
            }
            _ => {
                let mut candidates: Vec<String> = matches.into_iter().map(|(_, p)| p).collect();
                candidates.sort();
                Err(EnforceError::AmbiguousConstant {
                    constant: identifier.to_string(),
                    candidates,
                })
            }
        }
    }

    /// Repo-relative directories directly under each source root of
    /// `package`, plus their shared concern subdirectories.
    fn autoload_dirs(&self, package: &Package) -> Result<Vec<String>, EnforceError> {
        let mut dirs = Vec::new();
        for source_root in self.convention.source_roots() {
            let rel = package.join(source_root);
            let abs = self.root.join(&rel);
            if !abs.is_dir() {
                continue;
            }
            let entries = std::fs::read_dir(&abs).map_err(|e| EnforceError::io(&rel, e))?;
            let mut names = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| EnforceError::io(&rel, e))?;
                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    names.push(entry.file_name().to_string_lossy().to_string());
                }
            }
            names.sort();
            for name in names {
                let dir = format!("{rel}/{name}");
                let concerns = format!("{dir}/{}", self.convention.shared_concern_dir());
                dirs.push(dir);
                if self.root.join(&concerns).is_dir() {
                    dirs.push(concerns);
                }
            }
        }
        Ok(dirs)
    }
}
