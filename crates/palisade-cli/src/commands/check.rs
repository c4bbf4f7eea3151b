use std::path::Path;

use palisade_output::OutputFormatter;

/// Run `palisade check [FILES...]`.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, files: Vec<String>) -> i32 {
    match super::repository_root("check") {
        Ok(root) => run_at(&root, formatter, verbose, files),
        Err(code) => code,
    }
}

pub(crate) fn run_at(root: &Path, formatter: &dyn OutputFormatter, verbose: bool, files: Vec<String>) -> i32 {
    let mut engine = super::open_engine(root);
    let result = if files.is_empty() {
        engine.check_all()
    } else {
        engine.check(&files)
    };
    let result = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("palisade check: {}", e);
            return 2;
        }
    };

    let out = formatter.format_check(&result);
    if !out.is_empty() {
        println!("{}", out.trim_end());
    }

    if verbose {
        eprintln!(
            "palisade check: {} file(s), {} package(s), {}/{} reference(s) resolved, {} suppressed",
            result.files_analyzed.len(),
            result.info.packages,
            result.info.references_resolved,
            result.info.references_checked,
            result.info.suppressed,
        );
    }

    if result.errors.is_empty() {
        0
    } else {
        1
    }
}
