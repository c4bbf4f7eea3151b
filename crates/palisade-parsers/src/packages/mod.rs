//! Package manifest discovery.
//!
//! Every `package.yml` under the repository root declares one package. The
//! manifest at the root declares the root package (named `.`); any other
//! manifest's package is named after its directory relative to the root.

mod discover;
mod manifest;

use std::fs;
use std::path::{Path, PathBuf};

use palisade_core::store::PackageSource;
use palisade_core::types::{Package, PackageError};

use discover::find_manifests;
use manifest::{package_name_for, RawManifest};

/// File name of a package manifest.
pub const MANIFEST_FILE: &str = "package.yml";

/// Reads `package.yml` manifests from disk.
#[derive(Debug, Clone)]
pub struct ManifestReader {
    root: PathBuf,
}

impl ManifestReader {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parse a single manifest located in `dir` (relative to the root).
    pub fn read_manifest(&self, dir: &Path) -> Result<Package, PackageError> {
        let path = self.root.join(dir).join(MANIFEST_FILE);
        let display = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|source| PackageError::Io {
            path: display.clone(),
            source,
        })?;
        let raw = RawManifest::parse(&content).map_err(|message| PackageError::Manifest {
            path: display,
            message,
        })?;
        Ok(raw.into_package(package_name_for(dir), dir))
    }
}

impl PackageSource for ManifestReader {
    fn load_packages(&self) -> Result<Vec<Package>, PackageError> {
        let dirs = find_manifests(&self.root);
        tracing::debug!(root = %self.root.display(), manifests = dirs.len(), "discovered package manifests");
        dirs.iter().map(|dir| self.read_manifest(dir)).collect()
    }
}
