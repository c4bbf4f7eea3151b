use std::path::Path;

use palisade_output::OutputFormatter;

/// Run `palisade regenerate-todo [PACKS...]`.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, packs: Vec<String>) -> i32 {
    match super::repository_root("regenerate-todo") {
        Ok(root) => run_at(&root, formatter, verbose, packs),
        Err(code) => code,
    }
}

pub(crate) fn run_at(root: &Path, formatter: &dyn OutputFormatter, verbose: bool, packs: Vec<String>) -> i32 {
    let mut engine = super::open_engine(root);
    let summary = match engine.regenerate_todo(&packs) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("palisade regenerate-todo: {}", e);
            return 2;
        }
    };

    println!("{}", formatter.format_regenerate(&summary).trim_end());
    if verbose {
        eprintln!(
            "palisade regenerate-todo: {} package(s) cleared",
            summary.cleared.len()
        );
    }
    0
}
