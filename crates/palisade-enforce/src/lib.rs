//! Enforcement engine for palisade package boundaries.
//!
//! Resolves constant references to the packages that define them and
//! produces violations:
//! - B001: dependency (a package uses a constant from an undeclared dependency)
//! - B002: privacy (a constant outside the defining package's public directory)
//! - B003: namespace convention (a file sits outside its package's namespace)
//! - B004: constant filename (a definition cannot be loaded from its file path)
//! - B005: class methods as public APIs (an instance method in a public file)
//!
//! Findings listed in `package_palisade_todo.yml` or a packwerk
//! `package_todo.yml` are suppressed; see [`ledger`].

pub mod types;
pub mod error;
pub mod path_convention;
pub mod constant_resolver;
pub mod namespace;
pub mod violations;
pub mod constant_filename;
pub mod public_api;
pub mod ledger;
pub mod context;
pub mod engine;

pub use engine::{EnforcementEngine, ScanMode};
pub use error::EnforceError;
