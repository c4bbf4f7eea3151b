use palisade_core::types::PackageError;
use palisade_parsers::ruby::ParseError;

/// Errors that abort an analysis run.
///
/// Soft misses (unresolvable constants) and configuration problems in
/// ledger files are not errors; see `ConstantResolver::resolve` and
/// `ledger::validate`.
#[derive(Debug, thiserror::Error)]
pub enum EnforceError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// More than one file claims the same fully qualified constant.
    #[error("`{constant}` is defined by more than one file: {}", candidates.join(", "))]
    AmbiguousConstant {
        constant: String,
        candidates: Vec<String>,
    },
}

impl EnforceError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        EnforceError::Io {
            path: path.into(),
            source,
        }
    }
}
