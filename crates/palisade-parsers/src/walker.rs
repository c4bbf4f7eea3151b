use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

/// Enumerates source files under a repository root.
pub struct FileWalker {
    root: PathBuf,
    extension: String,
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            extension: "rb".to_string(),
            ignore_patterns: Vec::new(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Extra gitignore-style patterns to skip.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns.to_vec();
        self
    }

    /// Repo-relative `/`-separated paths of matching files, sorted.
    pub fn walk(&self) -> Vec<String> {
        self.walk_under("")
    }

    /// Like [`FileWalker::walk`], restricted to one subdirectory.
    pub fn walk_under(&self, subdir: &str) -> Vec<String> {
        let start = if subdir.is_empty() || subdir == "." {
            self.root.clone()
        } else {
            self.root.join(subdir)
        };
        if !start.exists() {
            return Vec::new();
        }

        let mut builder = WalkBuilder::new(&start);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .add_custom_ignore_filename(".palisadeignore");
        if !self.ignore_patterns.is_empty() {
            let mut overrides = OverrideBuilder::new(&self.root);
            for pattern in &self.ignore_patterns {
                if let Err(e) = overrides.add(&format!("!{pattern}")) {
                    tracing::warn!(pattern = %pattern, error = %e, "invalid ignore pattern");
                }
            }
            match overrides.build() {
                Ok(o) => {
                    builder.overrides(o);
                }
                Err(e) => tracing::warn!(error = %e, "failed to build ignore patterns"),
            }
        }

        let mut entries = Vec::new();
        for result in builder.build() {
            let entry = match result {
                Ok(e) => e,
                Err(_) => continue,
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Ok(rel) = path.strip_prefix(&self.root) {
                entries.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
        entries.sort();
        entries
    }
}
