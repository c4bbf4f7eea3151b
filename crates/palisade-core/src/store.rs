//! Package lookup: the [`PackageSource`] seam, the [`PackageIndex`] built
//! from it, and the lazily populated [`PackageCache`].

use std::collections::HashSet;

use crate::types::{Package, PackageError};

/// Supplies `Package` records, typically by reading on-disk manifests.
pub trait PackageSource {
    fn load_packages(&self) -> Result<Vec<Package>, PackageError>;
}

/// A fixed package list. Useful for hosts that already hold package records.
#[derive(Debug, Clone, Default)]
pub struct StaticPackages(pub Vec<Package>);

impl PackageSource for StaticPackages {
    fn load_packages(&self) -> Result<Vec<Package>, PackageError> {
        Ok(self.0.clone())
    }
}

/// All known packages, with lookup by name and by owned path.
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    packages: Vec<Package>,
}

impl PackageIndex {
    /// Build an index, rejecting duplicate package names.
    pub fn new(mut packages: Vec<Package>) -> Result<Self, PackageError> {
        let mut seen = HashSet::new();
        for pkg in &packages {
            if !seen.insert(pkg.name.as_str()) {
                return Err(PackageError::DuplicateName(pkg.name.clone()));
            }
        }
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { packages })
    }

    pub fn all(&self) -> &[Package] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Package> {
        self.packages
            .binary_search_by(|p| p.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.packages[i])
    }

    pub fn root(&self) -> Option<&Package> {
        self.packages.iter().find(|p| p.is_root())
    }

    /// The package owning a repo-relative path: the package with the longest
    /// directory prefix, falling back to the root package.
    pub fn owner_of(&self, path: &str) -> Option<&Package> {
        let path = normalize(path);
        self.packages
            .iter()
            .filter(|p| !p.is_root())
            .filter(|p| path.starts_with(&p.path_prefix()))
            .max_by_key(|p| p.path_prefix().len())
            .or_else(|| self.root())
    }

    /// Non-root packages whose name ends with `/<last_name>`.
    pub fn ending_with<'a>(&'a self, last_name: &'a str) -> impl Iterator<Item = &'a Package> + 'a {
        self.packages.iter().filter(move |p| {
            !p.is_root()
                && p.name
                    .strip_suffix(last_name)
                    .is_some_and(|head| head.ends_with('/'))
        })
    }
}

/// Lazily loads a [`PackageIndex`] from a [`PackageSource`] and keeps it until
/// [`PackageCache::bust_cache`] is called.
pub struct PackageCache {
    source: Box<dyn PackageSource>,
    index: Option<PackageIndex>,
}

impl PackageCache {
    pub fn new(source: Box<dyn PackageSource>) -> Self {
        Self {
            source,
            index: None,
        }
    }

    pub fn get(&mut self) -> Result<&PackageIndex, PackageError> {
        let index = match self.index.take() {
            Some(index) => index,
            None => {
                let index = PackageIndex::new(self.source.load_packages()?)?;
                tracing::debug!(packages = index.len(), "loaded package index");
                index
            }
        };
        Ok(self.index.insert(index))
    }

    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    pub fn bust_cache(&mut self) {
        self.index = None;
    }
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").map(str::to_string).unwrap_or(path)
}
