//! Ruby source adapter.
//!
//! Parses Ruby with tree-sitter and lowers the concrete syntax tree into the
//! handful of [`SourceNode`] kinds the boundary rules care about.

mod lower;
mod nodes;

use std::borrow::Cow;
use std::path::Path;

use tree_sitter::{Language, Parser};

pub use nodes::{ConstantRef, Definition, DefinitionKind, MethodDef, ParsedFile, SourceNode};

pub struct RubyParser {
    parser: Parser,
}

impl RubyParser {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Parse `source`, recording `path` (repo-relative) on the result.
    pub fn parse_source(&mut self, path: &str, source: &str) -> Result<ParsedFile, ParseError> {
        self.parser
            .set_language(&language())
            .map_err(|e| ParseError::Language(format!("{e}")))?;
        let tree = self
            .parser
            .parse(source.as_bytes(), None)
            .ok_or(ParseError::ParseFailed)?;
        if tree.root_node().has_error() {
            tracing::debug!(path, "syntax errors in source, lowering what parsed");
        }
        Ok(lower::lower(path, tree.root_node(), source.as_bytes()))
    }

    /// Read and parse `root/relative`. Bytes that are not UTF-8 (files with
    /// an `# encoding:` magic comment) are replaced before parsing.
    pub fn parse_file(&mut self, root: &Path, relative: &str) -> Result<ParsedFile, ParseError> {
        let bytes = std::fs::read(root.join(relative)).map_err(|source| ParseError::Io {
            path: relative.to_string(),
            source,
        })?;
        let source = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = source {
            tracing::debug!(path = relative, "source is not UTF-8, decoding lossily");
        }
        self.parse_source(relative, &source)
    }
}

impl Default for RubyParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("language error: {0}")]
    Language(String),
    #[error("parse failed")]
    ParseFailed,
}

fn language() -> Language {
    tree_sitter_ruby::LANGUAGE.into()
}
