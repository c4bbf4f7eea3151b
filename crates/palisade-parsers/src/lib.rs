//! Source and manifest parsing for palisade.
//!
//! - [`packages`] — `package.yml` discovery, implementing the core `PackageSource`
//! - [`ruby`] — tree-sitter Ruby adapter producing [`ruby::SourceNode`]s
//! - [`walker`] — gitignore-aware source file enumeration

pub mod packages;
pub mod ruby;
pub mod walker;
