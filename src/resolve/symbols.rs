//! Symbol table implementation
//!
//! Scopes live in an arena and point at their enclosing scope by id, so the
//! chain has no ownership cycles and every scope stays inspectable after the
//! analysis that created it has moved on.

use crate::common::Span;
use id_arena::{Arena, Id};
use indexmap::IndexMap;
use std::fmt;

/// Names of the types every scope is seeded with
pub const BUILTIN_TYPES: [&str; 2] = ["INTEGER", "REAL"];

/// Scope id
pub type ScopeId = Id<Scope>;

/// Kind of definition
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// Built-in type
    BuiltinType,
    /// Variable or parameter, with the name of its type symbol
    Variable { ty: String },
    /// Procedure with its parameters in declaration order
    Procedure { params: Vec<Symbol> },
}

/// Symbol information
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Case-normalized name
    pub name: String,
    pub kind: SymbolKind,
    /// Declaration site; default for builtins
    pub span: Span,
}

impl Symbol {
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::BuiltinType,
            span: Span::default(),
        }
    }

    pub fn variable(name: impl Into<String>, ty: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Variable { ty: ty.into() },
            span,
        }
    }

    pub fn procedure(name: impl Into<String>, params: Vec<Symbol>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Procedure { params },
            span,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable { .. })
    }

    /// Type name for variables
    pub fn type_name(&self) -> Option<&str> {
        match &self.kind {
            SymbolKind::Variable { ty } => Some(ty),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::BuiltinType => write!(f, "{}", self.name),
            SymbolKind::Variable { ty } => write!(f, "<{}:{}>", self.name, ty),
            SymbolKind::Procedure { params } => {
                write!(f, "<{}(", self.name)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")>")
            }
        }
    }
}

/// A single scope
#[derive(Debug)]
pub struct Scope {
    pub name: String,
    /// 1 for the global scope, +1 per enclosing step
    pub level: u32,
    pub enclosing: Option<ScopeId>,
    symbols: IndexMap<String, Symbol>,
}

impl Scope {
    /// New scope, already holding the builtin type symbols
    pub fn new(name: impl Into<String>, level: u32, enclosing: Option<ScopeId>) -> Self {
        let mut scope = Self {
            name: name.into(),
            level,
            enclosing,
            symbols: IndexMap::new(),
        };
        for ty in BUILTIN_TYPES {
            scope.define(Symbol::builtin(ty));
        }
        scope
    }

    /// Insert or overwrite by name, returning the displaced symbol
    pub fn define(&mut self, symbol: Symbol) -> Option<Symbol> {
        self.symbols.insert(symbol.name.clone(), symbol)
    }

    /// Look a name up in this scope only
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name.to_ascii_uppercase().as_str())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values().filter(|s| s.is_variable())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Every scope created during one analysis, linked by enclosing ids
#[derive(Debug)]
pub struct ScopeTree {
    arena: Arena<Scope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Open a scope nested in `enclosing`, one level deeper than it
    pub fn push(&mut self, name: impl Into<String>, enclosing: Option<ScopeId>) -> ScopeId {
        let level = enclosing.map_or(1, |id| self.arena[id].level + 1);
        self.arena.alloc(Scope::new(name, level, enclosing))
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id]
    }

    /// Define in scope `id` only
    pub fn define(&mut self, id: ScopeId, symbol: Symbol) -> Option<Symbol> {
        tracing::trace!(scope = %self.arena[id].name, symbol = %symbol, "define");
        self.arena[id].define(symbol)
    }

    /// Search `id`, then (unless `current_scope_only`) each enclosing scope
    /// outward, returning the first match
    pub fn lookup(&self, id: ScopeId, name: &str, current_scope_only: bool) -> Option<&Symbol> {
        if current_scope_only {
            return self.arena[id].get(name);
        }
        self.resolve(id, name).map(|(_, symbol)| symbol)
    }

    /// Walk the chain outward from `id`, returning the symbol together with
    /// the scope that declares it
    pub fn resolve(&self, id: ScopeId, name: &str) -> Option<(&Scope, &Symbol)> {
        let mut scope_id = Some(id);
        while let Some(current) = scope_id {
            let scope = &self.arena[current];
            tracing::trace!(ident = name, scope = %scope.name, "lookup");
            if let Some(symbol) = scope.get(name) {
                return Some((scope, symbol));
            }
            scope_id = scope.enclosing;
        }
        None
    }

    /// Find a scope by name, first created first
    pub fn find(&self, name: &str) -> Option<&Scope> {
        self.arena
            .iter()
            .map(|(_, scope)| scope)
            .find(|scope| scope.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Printable table for one scope
    pub fn dump(&self, id: ScopeId) -> ScopeDump<'_> {
        ScopeDump { tree: self, id }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Tabular rendering of one scope and its variable symbols
pub struct ScopeDump<'a> {
    tree: &'a ScopeTree,
    id: ScopeId,
}

impl fmt::Display for ScopeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.tree.get(self.id);
        writeln!(f, "SCOPE (SCOPED SYMBOL TABLE)")?;
        writeln!(f, "===========================")?;
        writeln!(f, "Scope name: {}", scope.name)?;
        writeln!(f, "Scope level: {}", scope.level)?;
        if let Some(enclosing) = scope.enclosing {
            writeln!(f, "Enclosing scope: {}", self.tree.get(enclosing).name)?;
        }
        writeln!(f, "Scope (Scope symbol table) contents")?;
        write!(f, "-----------------------------------")?;
        for symbol in scope.variables() {
            write!(f, "\n{}", symbol)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_nesting() {
        let mut tree = ScopeTree::new();
        let global = tree.push("global", None);
        tree.define(global, Symbol::variable("X", "INTEGER", Span::default()));

        let inner = tree.push("ALPHA", Some(global));
        tree.define(inner, Symbol::variable("Y", "REAL", Span::default()));

        // Both visible from the inner scope
        assert!(tree.lookup(inner, "x", false).is_some());
        assert!(tree.lookup(inner, "y", false).is_some());

        // Only x visible from the global scope
        assert!(tree.lookup(global, "x", false).is_some());
        assert!(tree.lookup(global, "y", false).is_none());

        assert_eq!(tree.get(global).level, 1);
        assert_eq!(tree.get(inner).level, 2);
    }

    #[test]
    fn test_shadowing() {
        let mut tree = ScopeTree::new();
        let global = tree.push("global", None);
        tree.define(global, Symbol::variable("X", "INTEGER", Span::default()));

        let inner = tree.push("ALPHA", Some(global));
        tree.define(inner, Symbol::variable("X", "REAL", Span::default()));

        assert_eq!(tree.lookup(inner, "X", false).unwrap().type_name(), Some("REAL"));
        assert_eq!(tree.lookup(global, "X", false).unwrap().type_name(), Some("INTEGER"));
    }

    #[test]
    fn test_current_scope_only() {
        let mut tree = ScopeTree::new();
        let global = tree.push("global", None);
        tree.define(global, Symbol::variable("X", "INTEGER", Span::default()));
        let inner = tree.push("ALPHA", Some(global));

        assert!(tree.lookup(inner, "X", true).is_none());
        assert!(tree.lookup(inner, "X", false).is_some());
    }

    #[test]
    fn test_builtin_types() {
        let mut tree = ScopeTree::new();
        let global = tree.push("global", None);
        let inner = tree.push("ALPHA", Some(global));

        // Seeded into every scope, so resolvable without walking outward
        assert!(tree.lookup(inner, "INTEGER", true).is_some());
        assert!(tree.lookup(inner, "real", true).is_some());

        // Unknown type should not exist
        assert!(tree.lookup(inner, "BOOLEAN", false).is_none());
    }

    #[test]
    fn test_define_overwrites() {
        let mut scope = Scope::new("global", 1, None);
        assert!(scope.define(Symbol::variable("A", "INTEGER", Span::default())).is_none());
        let old = scope.define(Symbol::variable("A", "REAL", Span::default()));
        assert_eq!(old.unwrap().type_name(), Some("INTEGER"));
        assert_eq!(scope.get("a").unwrap().type_name(), Some("REAL"));

        let names: Vec<_> = scope.symbols().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["INTEGER", "REAL", "A"]);
        assert_eq!(scope.variables().count(), 1);
    }
}
