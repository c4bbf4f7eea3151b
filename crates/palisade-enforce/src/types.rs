use palisade_core::store::PackageIndex;
use palisade_core::types::{Package, Rule};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub version: String,
    pub command: String,
    pub status: String, // "ok" | "error"
    pub files_analyzed: Vec<String>,
    pub errors: Vec<Violation>,
    pub info: ScanInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanInfo {
    pub packages: u32,
    pub references_checked: u32,
    pub references_resolved: u32,
    /// Findings matched by a ledger entry and left out of `errors`.
    pub suppressed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub rule: Rule,
    pub severity: String, // "ERROR" | "INFO"
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub constant: Option<String>,
    pub fix_hint: Option<String>,
    pub suppressed: bool,
    pub suppress_hint: Option<String>,
}

impl Violation {
    pub fn new(rule: Rule, file: &str, line: u32, column: u32, message: String) -> Self {
        Self {
            code: rule.code().to_string(),
            rule,
            severity: "ERROR".to_string(),
            message,
            file: file.to_string(),
            line,
            column,
            constant: None,
            fix_hint: None,
            suppressed: false,
            suppress_hint: None,
        }
    }

    pub fn with_constant(mut self, constant: &str) -> Self {
        self.constant = Some(constant.to_string());
        self
    }

    pub fn with_fix_hint(mut self, hint: String) -> Self {
        self.fix_hint = Some(hint);
        self
    }
}

/// A constant use resolved to the file and package expected to define it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantReference {
    pub identifier: String,
    pub root_namespace: String,
    pub defining_package: Package,
    pub definition_path: String,
    pub referencing_path: String,
    pub is_public: bool,
}

impl ConstantReference {
    pub fn referencing_package<'i>(&self, index: &'i PackageIndex) -> Option<&'i Package> {
        index.owner_of(&self.referencing_path)
    }
}

/// Where a file sits in the namespace hierarchy versus where its package
/// says it should sit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceContext {
    pub actual_namespace: String,
    pub actual_fully_qualified_name: String,
    pub expected_namespace: String,
    pub expected_file_path: String,
}

/// Outcome of a `regenerate-todo` run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegenerateSummary {
    pub version: String,
    pub command: String,
    pub files_analyzed: u32,
    /// Ledger files written, with the number of excluded paths in each.
    pub written: Vec<LedgerWrite>,
    /// Packages whose ledger was removed because no findings remain.
    pub cleared: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerWrite {
    pub package: String,
    pub path: String,
    pub entries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResult {
    pub version: String,
    pub command: String,
    pub status: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResult {
    pub version: String,
    pub command: String,
    pub constant: String,
    pub from: String,
    pub referencing_package: Option<String>,
    pub reference: Option<ConstantReference>,
}
