use std::path::Path;

use palisade_output::OutputFormatter;

/// Run `palisade validate`.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool) -> i32 {
    match super::repository_root("validate") {
        Ok(root) => run_at(&root, formatter, verbose),
        Err(code) => code,
    }
}

pub(crate) fn run_at(root: &Path, formatter: &dyn OutputFormatter, verbose: bool) -> i32 {
    let mut engine = super::open_engine(root);
    let result = match engine.validate() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("palisade validate: {}", e);
            return 2;
        }
    };

    let out = formatter.format_validate(&result);
    if !out.is_empty() {
        println!("{}", out.trim_end());
    }
    if verbose && result.errors.is_empty() {
        eprintln!("palisade validate: configuration ok");
    }

    if result.errors.is_empty() {
        0
    } else {
        1
    }
}
