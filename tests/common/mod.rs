/// Shared test helpers for all palisade integration tests.
///
/// Import from any integration test file with:
///   `#[path = "common/mod.rs"] mod common;`
use std::fs;
use std::path::{Path, PathBuf};

use palisade_core::config::{EnforceConfig, PalisadeConfig, CONFIG_DIR, CONFIG_FILE};
use palisade_enforce::EnforcementEngine;
use tempfile::TempDir;

/// A throwaway repository on disk. Hold the value to keep the directory alive.
pub struct TestRepo {
    dir: TempDir,
}

#[allow(dead_code)]
impl TestRepo {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    /// Write `<dir>/package.yml` from a YAML body.
    pub fn write_package_yml(&self, dir: &str, yaml: &str) -> &Self {
        let rel = if dir == "." {
            "package.yml".to_string()
        } else {
            format!("{dir}/package.yml")
        };
        self.write_file(&rel, yaml)
    }

    pub fn write_config(&self, config: &PalisadeConfig) -> &Self {
        let rel = format!("{CONFIG_DIR}/{CONFIG_FILE}");
        self.write_file(&rel, &serde_json::to_string_pretty(config).unwrap())
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).unwrap();
    }

    pub fn engine(&self) -> EnforcementEngine {
        EnforcementEngine::new(self.root())
    }
}

/// Configuration with only the dependency and privacy rules switched on.
#[allow(dead_code)]
pub fn boundary_config() -> PalisadeConfig {
    PalisadeConfig {
        enforce: EnforceConfig {
            dependency: true,
            privacy: true,
            namespace_convention: false,
            constant_filename: false,
            class_methods_as_public_apis: false,
        },
        ..PalisadeConfig::default()
    }
}

/// `packs/tools` (enforcing dependencies) calls `Apples.pick` from a public file.
#[allow(dead_code)]
pub fn apples_and_tools(tools_yml: &str) -> TestRepo {
    let repo = TestRepo::new();
    repo.write_package_yml(".", "")
        .write_package_yml("packs/apples", "enforce_privacy: true\n")
        .write_file("packs/apples/app/public/apples.rb", "module Apples\nend\n")
        .write_package_yml("packs/tools", tools_yml)
        .write_file(
            "packs/tools/app/public/tool.rb",
            "class Tool\n  def prune\n    Apples.pick\n  end\nend\n",
        );
    repo
}

#[allow(dead_code)]
pub const TOOL: &str = "packs/tools/app/public/tool.rb";
