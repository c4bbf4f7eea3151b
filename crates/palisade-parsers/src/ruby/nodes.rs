use serde::{Deserialize, Serialize};

/// A use of a (possibly scoped) constant in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantRef {
    /// Scoped name without a leading `::` (`Foo::Bar`).
    pub name: String,
    /// 1-based.
    pub line: u32,
    /// 0-based.
    pub column: u32,
    /// Text of the token that follows this reference in its chain: `Bar` for
    /// the `Foo` in `Foo::Bar`, `call` for `Foo::Bar` in `Foo::Bar.call`.
    pub next_sibling: Option<String>,
}

impl ConstantRef {
    /// True when this node is a prefix of a longer constant path, e.g. the
    /// `Foo` in `Foo::Bar`. Only the maximal path is ever resolved.
    pub fn is_partial(&self) -> bool {
        self.next_sibling
            .as_deref()
            .and_then(|s| s.chars().next())
            .is_some_and(|c| c.is_uppercase())
    }
}

/// A `def` together with what its enclosing scopes say about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    /// 1-based.
    pub line: u32,
    /// 0-based.
    pub column: u32,
    /// `def self.name`, or any `def` inside `class << self`.
    pub singleton: bool,
    /// Superclass of the nearest enclosing class, as written.
    pub enclosing_superclass: Option<String>,
    /// The nearest enclosing class or module calls `interface!`.
    pub in_interface: bool,
}

/// The node kinds the engine inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceNode {
    ModuleDef {
        name: String,
        qualified_name: String,
        line: u32,
    },
    ClassDef {
        name: String,
        qualified_name: String,
        superclass: Option<String>,
        line: u32,
    },
    ConstantAssignment {
        name: String,
        qualified_name: String,
        line: u32,
    },
    ConstantRef(ConstantRef),
    /// `class << target`.
    SingletonClass {
        target: String,
        line: u32,
    },
    MethodDef(MethodDef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Module,
    Class,
    Constant,
}

/// A constant definition together with its position in the nesting tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub kind: DefinitionKind,
    /// As written: `Foo::Bar` for `class Foo::Bar`, `BAZ` for `BAZ = 1`.
    pub name: String,
    pub qualified_name: String,
    pub line: u32,
    pub column: u32,
    /// Index of the enclosing definition in [`ParsedFile::definitions`].
    pub parent: Option<usize>,
    pub has_nested: bool,
}

/// Result of lowering one Ruby file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    pub nodes: Vec<SourceNode>,
    pub definitions: Vec<Definition>,
}

impl ParsedFile {
    pub fn references(&self) -> impl Iterator<Item = &ConstantRef> {
        self.nodes.iter().filter_map(|n| match n {
            SourceNode::ConstantRef(r) => Some(r),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDef> {
        self.nodes.iter().filter_map(|n| match n {
            SourceNode::MethodDef(m) => Some(m),
            _ => None,
        })
    }

    /// Fully qualified name of the first top-level definition.
    pub fn top_level_constant(&self) -> Option<&str> {
        self.definitions
            .iter()
            .find(|d| d.parent.is_none())
            .map(|d| d.qualified_name.as_str())
    }

    /// Definitions with no definitions nested inside them.
    pub fn leaf_definitions(&self) -> impl Iterator<Item = (usize, &Definition)> {
        self.definitions
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.has_nested)
    }

    /// The chain of definitions from the outermost down to `index`.
    pub fn nesting(&self, index: usize) -> Vec<&Definition> {
        let mut chain = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let Some(def) = self.definitions.get(i) else {
                break;
            };
            chain.push(def);
            cursor = def.parent;
        }
        chain.reverse();
        chain
    }
}
