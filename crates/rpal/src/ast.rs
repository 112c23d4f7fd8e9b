//! The raw AST the parser produces, and the standardized AST the control
//! builder consumes — the same tree shape serves both; standardization just
//! rewrites some node labels away (`let`, `where`, `fn` with >1 parameter,
//! `within`, `and`, `rec`, `function_form`, `@`) leaving only
//! `lambda`/`gamma`/`->`/`tau`/operators/leaves.

use std::fmt;

/// A node in the (possibly not yet standardized) program tree.
///
/// `label` is either a structural tag (`"let"`, `"gamma"`, `"+"`, …) or a
/// leaf tag in the exact form the control builder expects:
/// `<IDENTIFIER:x>`, `<INTEGER:n>`, `<STRING:s>`, `<NIL>`, `<TRUE_VALUE:t>`,
/// `<TRUE_VALUE:f>`, `<dummy>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub label: String,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self { label: label.into(), children: Vec::new() }
    }

    pub fn new(label: impl Into<String>, children: Vec<AstNode>) -> Self {
        Self { label: label.into(), children }
    }

    pub fn identifier(name: &str) -> Self {
        Self::leaf(format!("<IDENTIFIER:{name}>"))
    }

    /// Strips the `<IDENTIFIER:…>` wrapping, for nodes known to be leaves of
    /// that shape (binder positions).
    pub fn identifier_name(&self) -> Option<&str> {
        self.label.strip_prefix("<IDENTIFIER:")?.strip_suffix('>')
    }

    fn print(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{}{}", ".".repeat(depth), self.label)?;
        for child in &self.children {
            child.print(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f, 0)
    }
}
