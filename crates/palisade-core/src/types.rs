use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the package whose manifest sits at the repository root.
pub const ROOT_PACKAGE_NAME: &str = ".";

/// Metadata key marking a package whose namespace is derived automatically
/// by the autoloader (one namespace per package, nothing to enforce).
pub const AUTOMATIC_NAMESPACE_KEY: &str = "automatic_pack_namespace";

/// An independently-owned unit of source code.
///
/// Immutable for the duration of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Globally unique; nested packages use `/` separators (`packs/fruits/apples`).
    pub name: String,
    /// Directory relative to the repository root (`.` for the root package).
    pub directory: PathBuf,
    pub dependencies: BTreeSet<String>,
    pub enforces_dependencies: bool,
    pub enforces_privacy: bool,
    /// Package-relative public directory, when the manifest overrides the default.
    #[serde(default)]
    pub public_path: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Package {
    /// A package with no dependencies, no enforcement and no metadata.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let directory = PathBuf::from(&name);
        Self {
            name,
            directory,
            dependencies: BTreeSet::new(),
            enforces_dependencies: false,
            enforces_privacy: false,
            public_path: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_PACKAGE_NAME
    }

    /// Last `/`-separated segment of the name (`packs/fruits/apples` -> `apples`).
    pub fn last_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn depends_on(&self, other: &str) -> bool {
        self.dependencies.contains(other)
    }

    pub fn uses_automatic_namespace(&self) -> bool {
        match self.metadata.get(AUTOMATIC_NAMESPACE_KEY) {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s == "true",
            _ => false,
        }
    }

    /// Repo-relative prefix for files in this package: `packs/apples/`, or
    /// the empty string for the root package.
    pub fn path_prefix(&self) -> String {
        if self.is_root() || self.directory.as_os_str().is_empty() || self.directory == Path::new(".") {
            return String::new();
        }
        let mut prefix = self.directory.to_string_lossy().replace('\\', "/");
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        prefix
    }

    /// Repo-relative path of something inside this package.
    pub fn join(&self, relative: &str) -> String {
        format!("{}{}", self.path_prefix(), relative.trim_start_matches('/'))
    }

    /// Repo-relative public directory of this package, with a trailing `/`.
    pub fn public_dir(&self, default_public_path: &str) -> String {
        let rel = self
            .public_path
            .as_deref()
            .unwrap_or(default_public_path)
            .trim_end_matches('/');
        format!("{}/", self.join(rel))
    }

    /// Whether `path` (repo-relative) lies under this package's public directory.
    pub fn is_public_path(&self, path: &str, default_public_path: &str) -> bool {
        path.starts_with(&self.public_dir(default_public_path))
    }
}

/// The boundary rules palisade knows how to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Dependency,
    Privacy,
    NamespaceConvention,
    ConstantFilename,
    ClassMethodsAsPublicApis,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::Dependency,
        Rule::Privacy,
        Rule::NamespaceConvention,
        Rule::ConstantFilename,
        Rule::ClassMethodsAsPublicApis,
    ];

    /// Key used in configuration and ledger files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Dependency => "dependency",
            Rule::Privacy => "privacy",
            Rule::NamespaceConvention => "namespace_convention",
            Rule::ConstantFilename => "constant_filename",
            Rule::ClassMethodsAsPublicApis => "class_methods_as_public_apis",
        }
    }

    /// Short code shown in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Rule::Dependency => "B001",
            Rule::Privacy => "B002",
            Rule::NamespaceConvention => "B003",
            Rule::ConstantFilename => "B004",
            Rule::ClassMethodsAsPublicApis => "B005",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown rule: {s}"))
    }
}

/// Errors raised while loading or indexing packages.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed package manifest {path}: {message}")]
    Manifest { path: String, message: String },

    #[error("package name `{0}` is declared by more than one manifest")]
    DuplicateName(String),
}
