//! Concrete tree to [`SourceNode`] lowering.

use tree_sitter::Node;

use super::nodes::{ConstantRef, Definition, DefinitionKind, MethodDef, ParsedFile, SourceNode};

pub(crate) fn lower(path: &str, root: Node<'_>, source: &[u8]) -> ParsedFile {
    let mut lowering = Lowering {
        source,
        nodes: Vec::new(),
        definitions: Vec::new(),
        scopes: Vec::new(),
    };
    lowering.visit(root, &[], None, None);
    ParsedFile {
        path: path.to_string(),
        nodes: lowering.nodes,
        definitions: lowering.definitions,
    }
}

struct Lowering<'s> {
    source: &'s [u8],
    nodes: Vec<SourceNode>,
    definitions: Vec<Definition>,
    /// Enclosing bodies, innermost last.
    scopes: Vec<Scope>,
}

enum Scope {
    Class {
        superclass: Option<String>,
        interface: bool,
    },
    Module {
        interface: bool,
    },
    SingletonClass {
        of_self: bool,
    },
}

impl<'s> Lowering<'s> {
    fn visit(&mut self, node: Node<'_>, nesting: &[String], parent: Option<usize>, hint: Option<&str>) {
        match node.kind() {
            "module" | "class" => self.visit_definition(node, nesting, parent),
            "assignment" | "operator_assignment" => self.visit_assignment(node, nesting, parent),
            "scope_resolution" => self.visit_scope_resolution(node, nesting, parent, hint),
            "constant" => {
                let name = node_text(node, self.source).to_string();
                self.push_ref(node, name, hint);
            }
            "call" => self.visit_call(node, nesting, parent),
            "singleton_class" => self.visit_singleton_class(node, nesting, parent),
            "method" | "singleton_method" => self.visit_method(node, nesting, parent),
            _ => self.visit_children(node, nesting, parent, &[]),
        }
    }

    fn visit_children(&mut self, node: Node<'_>, nesting: &[String], parent: Option<usize>, skip: &[usize]) {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in children {
            if skip.contains(&child.id()) {
                continue;
            }
            self.visit(child, nesting, parent, None);
        }
    }

    fn visit_definition(&mut self, node: Node<'_>, nesting: &[String], parent: Option<usize>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return self.visit_children(node, nesting, parent, &[]);
        };
        let written = node_text(name_node, self.source);
        let name = written.trim_start_matches("::").to_string();
        let qualified_name = qualify(nesting, &name, written.starts_with("::"));
        let line = line_of(node);

        let mut skip = vec![name_node.id()];
        let superclass = node.child_by_field_name("superclass");
        let superclass_name = superclass.and_then(|s| {
            let mut cursor = s.walk();
            let expr = s.named_children(&mut cursor).next();
            expr.map(|e| node_text(e, self.source).trim_start_matches("::").to_string())
        });

        let interface = self.declares_interface(node);
        let scope = if node.kind() == "module" {
            Scope::Module { interface }
        } else {
            Scope::Class {
                superclass: superclass_name.clone(),
                interface,
            }
        };

        let (kind, source_node) = if node.kind() == "module" {
            (
                DefinitionKind::Module,
                SourceNode::ModuleDef {
                    name: name.clone(),
                    qualified_name: qualified_name.clone(),
                    line,
                },
            )
        } else {
            (
                DefinitionKind::Class,
                SourceNode::ClassDef {
                    name: name.clone(),
                    qualified_name: qualified_name.clone(),
                    superclass: superclass_name,
                    line,
                },
            )
        };

        // The superclass expression belongs to the enclosing scope.
        if let Some(s) = superclass {
            skip.push(s.id());
            self.visit_children(s, nesting, parent, &[]);
        }

        let index = self.push_definition(kind, name.clone(), qualified_name, node, parent);
        self.nodes.push(source_node);

        let inner: Vec<String> = nesting.iter().cloned().chain(std::iter::once(name)).collect();
        self.scopes.push(scope);
        self.visit_children(node, &inner, Some(index), &skip);
        self.scopes.pop();
    }

    fn visit_singleton_class(&mut self, node: Node<'_>, nesting: &[String], parent: Option<usize>) {
        let target = node
            .child_by_field_name("value")
            .map(|v| node_text(v, self.source).to_string())
            .unwrap_or_default();
        self.scopes.push(Scope::SingletonClass {
            of_self: target == "self",
        });
        self.nodes.push(SourceNode::SingletonClass {
            target,
            line: line_of(node),
        });
        self.visit_children(node, nesting, parent, &[]);
        self.scopes.pop();
    }

    fn visit_method(&mut self, node: Node<'_>, nesting: &[String], parent: Option<usize>) {
        let name_node = node.child_by_field_name("name");
        let name = name_node
            .map(|n| node_text(n, self.source).to_string())
            .unwrap_or_default();
        let in_singleton_class = self
            .scopes
            .iter()
            .rev()
            .find_map(|s| match s {
                Scope::SingletonClass { of_self } => Some(*of_self),
                _ => None,
            })
            .unwrap_or(false);
        let enclosing_superclass = self.scopes.iter().rev().find_map(|s| match s {
            Scope::Class { superclass, .. } => Some(superclass.clone()),
            _ => None,
        });
        let in_interface = self
            .scopes
            .iter()
            .rev()
            .find_map(|s| match s {
                Scope::Class { interface, .. } | Scope::Module { interface } => Some(*interface),
                Scope::SingletonClass { .. } => None,
            })
            .unwrap_or(false);

        let pos = node.start_position();
        self.nodes.push(SourceNode::MethodDef(MethodDef {
            name,
            line: pos.row as u32 + 1,
            column: pos.column as u32,
            singleton: node.kind() == "singleton_method" || in_singleton_class,
            enclosing_superclass: enclosing_superclass.flatten(),
            in_interface,
        }));

        let skip: Vec<usize> = name_node.map(|n| n.id()).into_iter().collect();
        self.visit_children(node, nesting, parent, &skip);
    }

    /// Whether the body of `node` calls `interface!`.
    fn declares_interface(&self, node: Node<'_>) -> bool {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        children.into_iter().any(|child| {
            if child.kind() != "body_statement" {
                return node_text(child, self.source) == "interface!";
            }
            let mut inner = child.walk();
            let found = child
                .named_children(&mut inner)
                .any(|statement| node_text(statement, self.source) == "interface!");
            found
        })
    }

    fn visit_assignment(&mut self, node: Node<'_>, nesting: &[String], parent: Option<usize>) {
        let left = node.child_by_field_name("left");
        let target = left.filter(|l| {
            l.kind() == "constant"
                || (l.kind() == "scope_resolution"
                    && is_constant_path(node_text(*l, self.source).trim_start_matches("::")))
        });
        let Some(target) = target else {
            return self.visit_children(node, nesting, parent, &[]);
        };

        let written = node_text(target, self.source);
        let name = written.trim_start_matches("::").to_string();
        let qualified_name = qualify(nesting, &name, written.starts_with("::"));
        let line = line_of(node);
        let index = self.push_definition(
            DefinitionKind::Constant,
            name.clone(),
            qualified_name.clone(),
            node,
            parent,
        );
        self.nodes.push(SourceNode::ConstantAssignment {
            name: name.clone(),
            qualified_name,
            line,
        });

        if let Some(right) = node.child_by_field_name("right") {
            let inner: Vec<String> = nesting.iter().cloned().chain(std::iter::once(name)).collect();
            self.visit(right, &inner, Some(index), None);
        }
    }

    fn visit_scope_resolution(
        &mut self,
        node: Node<'_>,
        nesting: &[String],
        parent: Option<usize>,
        hint: Option<&str>,
    ) {
        let name = node_text(node, self.source).trim_start_matches("::");
        if is_constant_path(name) {
            self.push_ref(node, name.to_string(), hint);
        }
        if let Some(scope) = node.child_by_field_name("scope") {
            let next = node
                .child_by_field_name("name")
                .map(|n| node_text(n, self.source).to_string());
            self.visit(scope, nesting, parent, next.as_deref());
        }
    }

    fn visit_call(&mut self, node: Node<'_>, nesting: &[String], parent: Option<usize>) {
        let receiver = node.child_by_field_name("receiver");
        let method = node.child_by_field_name("method");
        let mut skip = Vec::new();
        if let Some(r) = receiver {
            skip.push(r.id());
            let method_name = method.map(|m| node_text(m, self.source).to_string());
            self.visit(r, nesting, parent, method_name.as_deref());
        }
        if let Some(m) = method {
            skip.push(m.id());
        }
        self.visit_children(node, nesting, parent, &skip);
    }

    fn push_ref(&mut self, node: Node<'_>, name: String, hint: Option<&str>) {
        let pos = node.start_position();
        self.nodes.push(SourceNode::ConstantRef(ConstantRef {
            name,
            line: pos.row as u32 + 1,
            column: pos.column as u32,
            next_sibling: hint.map(str::to_string),
        }));
    }

    fn push_definition(
        &mut self,
        kind: DefinitionKind,
        name: String,
        qualified_name: String,
        node: Node<'_>,
        parent: Option<usize>,
    ) -> usize {
        if let Some(p) = parent.and_then(|p| self.definitions.get_mut(p)) {
            p.has_nested = true;
        }
        let pos = node.start_position();
        self.definitions.push(Definition {
            kind,
            name,
            qualified_name,
            line: pos.row as u32 + 1,
            column: pos.column as u32,
            parent,
            has_nested: false,
        });
        self.definitions.len() - 1
    }
}

fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

fn qualify(nesting: &[String], name: &str, absolute: bool) -> String {
    if absolute || nesting.is_empty() {
        return name.to_string();
    }
    format!("{}::{}", nesting.join("::"), name)
}

/// `Foo`, `Foo::Bar`: every segment starts upper-case and is an identifier.
pub(crate) fn is_constant_path(text: &str) -> bool {
    !text.is_empty()
        && text.split("::").all(|seg| {
            seg.chars().next().is_some_and(|c| c.is_uppercase())
                && seg.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
}
