//! One module per subcommand. Each `run` returns the process exit code:
//! `0` clean, `1` violations or configuration errors, `2` operational failure.

pub mod check;
pub mod init;
pub mod regenerate_todo;
pub mod resolve;
pub mod validate;

use std::path::{Path, PathBuf};

use palisade_core::config::CONFIG_DIR;
use palisade_enforce::EnforcementEngine;

/// The repository root: the nearest ancestor of the working directory holding
/// `.palisade/` or a root `package.yml`, else the working directory itself.
pub(crate) fn repository_root(command: &str) -> Result<PathBuf, i32> {
    let cwd = std::env::current_dir().map_err(|e| {
        eprintln!("palisade {}: failed to get current directory: {}", command, e);
        2
    })?;
    Ok(find_root(&cwd))
}

pub(crate) fn find_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_DIR).is_dir() || dir.join("package.yml").is_file())
        .unwrap_or(start)
        .to_path_buf()
}

pub(crate) fn open_engine(root: &Path) -> EnforcementEngine {
    tracing::debug!(root = %root.display(), "opening repository");
    EnforcementEngine::new(root)
}
