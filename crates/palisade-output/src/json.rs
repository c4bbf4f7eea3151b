use crate::OutputFormatter;
use palisade_enforce::types::{RegenerateSummary, ResolveResult, ScanResult, ValidateResult};

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_check(&self, result: &ScanResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_validate(&self, result: &ValidateResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_regenerate(&self, summary: &RegenerateSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_default()
    }
    fn format_init(&self, written: &[String]) -> String {
        let value = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "command": "init",
            "written": written,
        });
        serde_json::to_string_pretty(&value).unwrap_or_default()
    }
    fn format_resolve(&self, result: &ResolveResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
}
