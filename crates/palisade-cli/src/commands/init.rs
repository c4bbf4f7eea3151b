use std::path::Path;

use palisade_output::OutputFormatter;

/// Run `palisade init [PACKS...]`.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, packs: Vec<String>) -> i32 {
    match super::repository_root("init") {
        Ok(root) => run_at(&root, formatter, verbose, packs),
        Err(code) => code,
    }
}

pub(crate) fn run_at(root: &Path, formatter: &dyn OutputFormatter, verbose: bool, packs: Vec<String>) -> i32 {
    let mut engine = super::open_engine(root);
    let written = match engine.init(&packs) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("palisade init: {}", e);
            return 2;
        }
    };

    let out = formatter.format_init(&written);
    if !out.is_empty() {
        println!("{}", out.trim_end());
    }
    if verbose {
        eprintln!("palisade init: {} enablement file(s) written", written.len());
    }
    0
}
