//! Core types, package lookup, and configuration for palisade.
//!
//! This crate provides the foundational data structures used across all palisade crates:
//! - [`types`] — `Package`, `Rule`, and error types
//! - [`store`] — The [`PackageSource`](store::PackageSource) seam, the package index and its cache
//! - [`config`] — Configuration loading from `.palisade/palisade.json`

pub mod config;
pub mod store;
pub mod types;
