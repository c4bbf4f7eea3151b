//! The on-disk shape of `package.yml`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use palisade_core::types::{Package, ROOT_PACKAGE_NAME};
use serde::Deserialize;

/// `enforce_dependencies` / `enforce_privacy` accept a boolean or `"strict"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum EnforcementSetting {
    Flag(bool),
    Mode(String),
}

impl EnforcementSetting {
    fn enforces(&self) -> bool {
        match self {
            EnforcementSetting::Flag(b) => *b,
            EnforcementSetting::Mode(m) => m == "strict" || m == "true",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawManifest {
    enforce_dependencies: Option<EnforcementSetting>,
    enforce_privacy: Option<EnforcementSetting>,
    dependencies: Option<Vec<String>>,
    public_path: Option<String>,
    metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl RawManifest {
    pub(crate) fn parse(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Option<RawManifest>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| e.to_string())
    }

    pub(crate) fn into_package(self, name: String, dir: &Path) -> Package {
        let directory = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir.to_path_buf()
        };
        Package {
            name,
            directory,
            dependencies: self
                .dependencies
                .unwrap_or_default()
                .into_iter()
                .collect::<BTreeSet<_>>(),
            enforces_dependencies: self.enforce_dependencies.is_some_and(|s| s.enforces()),
            enforces_privacy: self.enforce_privacy.is_some_and(|s| s.enforces()),
            public_path: self.public_path,
            metadata: self.metadata.unwrap_or_default(),
        }
    }
}

/// Package name for a manifest directory relative to the repository root.
pub(crate) fn package_name_for(dir: &Path) -> String {
    if dir.as_os_str().is_empty() || dir == Path::new(".") {
        return ROOT_PACKAGE_NAME.to_string();
    }
    dir.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
