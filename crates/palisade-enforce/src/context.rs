use std::path::{Path, PathBuf};

use palisade_core::config::PalisadeConfig;
use palisade_core::store::{PackageCache, PackageIndex, PackageSource};

use crate::error::EnforceError;
use crate::ledger::SuppressionLedger;
use crate::namespace::NamespaceConventionChecker;
use crate::path_convention::PathConvention;

/// Per-run state: configuration plus everything derived from disk, loaded on
/// first use and dropped by [`AnalysisContext::bust_cache`].
pub struct AnalysisContext {
    root: PathBuf,
    config: PalisadeConfig,
    convention: PathConvention,
    packages: PackageCache,
    derived: Option<DerivedState>,
}

struct DerivedState {
    ledger: SuppressionLedger,
    namespaces: NamespaceConventionChecker,
}

/// Borrowed view of a loaded context.
pub struct Loaded<'a> {
    pub index: &'a PackageIndex,
    pub ledger: &'a SuppressionLedger,
    pub namespaces: &'a NamespaceConventionChecker,
    pub config: &'a PalisadeConfig,
    pub convention: &'a PathConvention,
}

impl AnalysisContext {
    pub fn new(root: &Path, config: PalisadeConfig, source: Box<dyn PackageSource>) -> Self {
        let convention = PathConvention::new(&config.convention);
        Self {
            root: root.to_path_buf(),
            config,
            convention,
            packages: PackageCache::new(source),
            derived: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &PalisadeConfig {
        &self.config
    }

    pub fn convention(&self) -> &PathConvention {
        &self.convention
    }

    pub fn is_loaded(&self) -> bool {
        self.packages.is_loaded() && self.derived.is_some()
    }

    pub fn packages(&mut self) -> Result<&PackageIndex, EnforceError> {
        Ok(self.packages.get()?)
    }

    /// Load packages, ledger files and the reserved-namespace map if needed.
    pub fn load(&mut self) -> Result<Loaded<'_>, EnforceError> {
        let index = self.packages.get()?;
        let derived = match self.derived.take() {
            Some(derived) => derived,
            None => DerivedState {
                ledger: SuppressionLedger::load(&self.root, index)?,
                namespaces: NamespaceConventionChecker::new(
                    &self.config.namespaces,
                    self.convention.clone(),
                    index,
                ),
            },
        };
        let derived = self.derived.insert(derived);
        Ok(Loaded {
            index,
            ledger: &derived.ledger,
            namespaces: &derived.namespaces,
            config: &self.config,
            convention: &self.convention,
        })
    }

    pub fn bust_cache(&mut self) {
        self.packages.bust_cache();
        self.derived = None;
    }
}
