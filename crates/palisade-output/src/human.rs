use crate::human_helpers::{format_reference_human, format_violation_human};
use crate::OutputFormatter;
use palisade_enforce::types::{RegenerateSummary, ResolveResult, ScanResult, ValidateResult};

pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_check(&self, result: &ScanResult) -> String {
        if result.errors.is_empty() {
            return String::new(); // Clean check = empty stdout
        }

        let mut out = String::new();
        for v in &result.errors {
            out.push_str(&format_violation_human(v));
        }

        out.push_str(&format!(
            "\n{} violation(s) in {} file(s)",
            result.errors.len(),
            result.files_analyzed.len(),
        ));
        if result.info.suppressed > 0 {
            out.push_str(&format!(", {} suppressed", result.info.suppressed));
        }
        out.push('\n');
        out
    }

    fn format_validate(&self, result: &ValidateResult) -> String {
        let mut out = String::new();
        for error in &result.errors {
            out.push_str(error);
            out.push_str("\n\n");
        }
        if !result.errors.is_empty() {
            out.push_str(&format!("{} configuration error(s)\n", result.errors.len()));
        }
        out
    }

    fn format_regenerate(&self, summary: &RegenerateSummary) -> String {
        let mut out = String::new();
        for write in &summary.written {
            out.push_str(&format!("wrote {} ({} file(s))\n", write.path, write.entries));
        }
        for package in &summary.cleared {
            out.push_str(&format!("cleared {}\n", package));
        }
        out.push_str(&format!(
            "Analyzed {} file(s); {} todo file(s) written\n",
            summary.files_analyzed,
            summary.written.len(),
        ));
        out
    }

    fn format_init(&self, written: &[String]) -> String {
        written.iter().map(|path| format!("wrote {}\n", path)).collect()
    }

    fn format_resolve(&self, result: &ResolveResult) -> String {
        let from_package = result.referencing_package.as_deref().unwrap_or("(none)");
        let mut out = format!("{} from {} [{}]\n", result.constant, result.from, from_package);
        match &result.reference {
            Some(reference) => out.push_str(&format_reference_human(reference)),
            None => out.push_str("  unresolved\n"),
        }
        out
    }
}
