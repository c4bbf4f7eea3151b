//! Locating manifests on disk.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use super::MANIFEST_FILE;

/// Directories (relative to `root`, `""` for the root itself) that contain a
/// package manifest, sorted.
pub(crate) fn find_manifests(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .add_custom_ignore_filename(".palisadeignore")
        .build();

    let mut dirs = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if entry.file_name() != MANIFEST_FILE {
            continue;
        }
        let Some(parent) = entry.path().parent() else {
            continue;
        };
        match parent.strip_prefix(root) {
            Ok(rel) => dirs.push(rel.to_path_buf()),
            Err(_) => continue,
        }
    }
    dirs.sort();
    dirs
}
