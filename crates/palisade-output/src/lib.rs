//! Output formatters for palisade command results.
//!
//! Provides two output modes:
//! - **Human** (default): one block per finding, then a summary line
//! - **JSON** (`--json`): machine-readable structured output

pub mod human;
pub(crate) mod human_helpers;
pub mod json;

use palisade_enforce::types::{RegenerateSummary, ResolveResult, ScanResult, ValidateResult};

pub trait OutputFormatter {
    fn format_check(&self, result: &ScanResult) -> String;
    fn format_validate(&self, result: &ValidateResult) -> String;
    fn format_regenerate(&self, summary: &RegenerateSummary) -> String;
    fn format_init(&self, written: &[String]) -> String;
    fn format_resolve(&self, result: &ResolveResult) -> String;
}
