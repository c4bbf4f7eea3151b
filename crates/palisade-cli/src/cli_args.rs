use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "palisade", version, about = "Package boundary enforcement for modular Ruby monorepos")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as structured JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging and a summary on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Check files for boundary violations
    Check {
        /// Files to check (empty = every source file in the repository)
        files: Vec<String>,
    },

    /// Report configuration errors in todo and enablement files
    Validate,

    /// Rebuild package_palisade_todo.yml files from a fresh scan
    RegenerateTodo {
        /// Packages to regenerate (empty = all non-root packages)
        packs: Vec<String>,
    },

    /// Write default package_palisade.yml enablement files
    Init {
        /// Packages to initialize (empty = all non-root packages)
        packs: Vec<String>,
    },

    /// Show which package and file a constant resolves to
    Resolve {
        /// Constant name, e.g. `Apples::Tool`
        constant: String,
        /// File the constant is referenced from
        #[arg(long)]
        from: String,
    },
}

#[cfg(test)]
#[path = "cli_args_tests.rs"]
mod tests;
