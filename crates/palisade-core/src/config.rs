//! Configuration file loading for palisade.
//!
//! Reads `.palisade/palisade.json` at the repository root and provides typed
//! access to all settings. Falls back to defaults when the config file is
//! missing or incomplete.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Rule;

/// Directory (relative to the repository root) holding palisade's own files.
pub const CONFIG_DIR: &str = ".palisade";
pub const CONFIG_FILE: &str = "palisade.json";

/// Top-level palisade configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PalisadeConfig {
    #[serde(default)]
    pub enforce: EnforceConfig,
    #[serde(default)]
    pub convention: ConventionConfig,
    #[serde(default)]
    pub namespaces: NamespaceConfig,
    #[serde(default)]
    pub pack_level: PackLevelConfig,
    #[serde(default)]
    pub public_api: PublicApiConfig,
    /// References whose name contains any of these substrings are never
    /// flagged by the dependency or privacy checks.
    #[serde(default)]
    pub exempt_constant_substrings: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// Per-rule enablement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforceConfig {
    #[serde(default = "default_true")]
    pub dependency: bool,
    #[serde(default = "default_true")]
    pub privacy: bool,
    #[serde(default = "default_true")]
    pub namespace_convention: bool,
    #[serde(default = "default_true")]
    pub constant_filename: bool,
    /// Off unless configured.
    #[serde(default)]
    pub class_methods_as_public_apis: bool,
}

/// Path convention knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConventionConfig {
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<String>,
    #[serde(default = "default_shared_concern_dir")]
    pub shared_concern_dir: String,
    #[serde(default = "default_public_path")]
    pub public_path: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Whole-word inflections, e.g. `HTML` makes the segment `html` camelize
    /// to `HTML` rather than `Html`.
    #[serde(default)]
    pub acronyms: Vec<String>,
}

/// Namespace reservation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Packages opted into namespace enforcement.
    #[serde(default)]
    pub include_packs: Vec<String>,
    /// Namespaces any package may use.
    #[serde(default)]
    pub globally_permitted: Vec<String>,
}

/// Settings for the class-methods-as-public-APIs rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicApiConfig {
    /// Superclasses (as written, e.g. `T::Struct`) whose subclasses may
    /// expose instance methods from the public directory.
    #[serde(default)]
    pub acceptable_parent_classes: Vec<String>,
}

/// Which rules may be configured per package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackLevelConfig {
    #[serde(default = "default_permitted_rules")]
    pub permitted_rules: Vec<Rule>,
    #[serde(default)]
    pub required_rules: Vec<Rule>,
}

fn default_true() -> bool {
    true
}
fn default_source_roots() -> Vec<String> {
    vec!["app".to_string()]
}
fn default_shared_concern_dir() -> String {
    "concerns".to_string()
}
fn default_public_path() -> String {
    "app/public".to_string()
}
fn default_extension() -> String {
    "rb".to_string()
}
fn default_permitted_rules() -> Vec<Rule> {
    Rule::ALL.to_vec()
}

impl Default for EnforceConfig {
    fn default() -> Self {
        Self {
            dependency: true,
            privacy: true,
            namespace_convention: true,
            constant_filename: true,
            class_methods_as_public_apis: false,
        }
    }
}

impl Default for ConventionConfig {
    fn default() -> Self {
        Self {
            source_roots: default_source_roots(),
            shared_concern_dir: default_shared_concern_dir(),
            public_path: default_public_path(),
            extension: default_extension(),
            acronyms: vec![],
        }
    }
}

impl Default for PackLevelConfig {
    fn default() -> Self {
        Self {
            permitted_rules: default_permitted_rules(),
            required_rules: vec![],
        }
    }
}

impl EnforceConfig {
    pub fn is_enabled(&self, rule: Rule) -> bool {
        match rule {
            Rule::Dependency => self.dependency,
            Rule::Privacy => self.privacy,
            Rule::NamespaceConvention => self.namespace_convention,
            Rule::ConstantFilename => self.constant_filename,
            Rule::ClassMethodsAsPublicApis => self.class_methods_as_public_apis,
        }
    }

    pub fn enabled_rules(&self) -> Vec<Rule> {
        Rule::ALL
            .into_iter()
            .filter(|r| self.is_enabled(*r))
            .collect()
    }
}

impl PackLevelConfig {
    pub fn is_permitted(&self, rule: Rule) -> bool {
        self.permitted_rules.contains(&rule)
    }
}

impl PalisadeConfig {
    /// Load configuration from `.palisade/palisade.json` under `root`.
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Self::default()
            }
        }
    }
}
