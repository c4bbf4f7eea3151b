use std::path::Path;

use palisade_output::OutputFormatter;

/// Run `palisade resolve CONSTANT --from FILE`.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, constant: String, from: String) -> i32 {
    match super::repository_root("resolve") {
        Ok(root) => run_at(&root, formatter, verbose, &constant, &from),
        Err(code) => code,
    }
}

pub(crate) fn run_at(
    root: &Path,
    formatter: &dyn OutputFormatter,
    verbose: bool,
    constant: &str,
    from: &str,
) -> i32 {
    let mut engine = super::open_engine(root);
    let result = match engine.resolve(constant, from) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("palisade resolve: {}", e);
            return 2;
        }
    };

    println!("{}", formatter.format_resolve(&result).trim_end());
    if verbose && result.reference.is_none() {
        eprintln!("palisade resolve: no file defines `{}`", constant);
    }
    0
}
