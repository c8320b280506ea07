//! Name resolution: symbols, scopes, and the semantic analyzer

pub mod resolver;
pub mod symbols;

pub use resolver::{Analysis, GLOBAL_SCOPE, ScopeEvent, SemanticAnalyzer, analyze};
pub use symbols::{Scope, ScopeId, ScopeTree, Symbol, SymbolKind};
