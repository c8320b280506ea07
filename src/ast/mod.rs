//! Abstract Syntax Tree for the Pascal subset
//!
//! This module defines the AST types produced by the parser. The tree is a
//! strict single-owner tree: every node owns its children, nothing is shared,
//! and neither later pass mutates it. Each pass is one exhaustive `match` over
//! these closed enums.

use crate::common::Span;
use serde::{Deserialize, Serialize};

/// Root node: `program NAME; block.`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: Ident,
    pub block: Block,
}

/// Declarations followed by the compound statement they apply to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub declarations: Vec<Decl>,
    pub body: Compound,
}

/// A name as written in the source, case-normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ==================== DECLARATIONS ====================

/// Declaration inside a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Var(VarDecl),
    Procedure(ProcedureDecl),
}

/// One declared variable; `var a, b : integer` yields two of these
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub var: Ident,
    pub ty: TypeSpec,
}

/// Procedure declaration with its own nested block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub block: Block,
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub var: Ident,
    pub ty: TypeSpec,
}

/// Type annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub kind: TypeKind,
    pub span: Span,
}

impl TypeSpec {
    /// Name the type resolves under in the symbol table
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// The builtin types the grammar admits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Integer,
    Real,
}

impl TypeKind {
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Integer => "INTEGER",
            TypeKind::Real => "REAL",
        }
    }

    /// Reserved word spelling
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Integer => "integer",
            TypeKind::Real => "real",
        }
    }
}

// ==================== STATEMENTS ====================

/// `begin stmt; ...; stmt end`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    pub statements: Vec<Stmt>,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Nested `begin ... end`
    Compound(Compound),
    /// `target := value`
    Assign(Assign),
    /// Empty statement
    NoOp,
}

/// Assignment statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub target: Ident,
    pub value: Expr,
}

// ==================== EXPRESSIONS ====================

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Read of a variable
    Var(Ident),
    /// Numeric literal
    Num { value: Number, span: Span },
    /// Unary sign
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        span: Span,
    },
    /// Binary arithmetic; `span` covers the operator token
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    /// Span of the token that introduced this node
    pub fn span(&self) -> Span {
        match self {
            Expr::Var(ident) => ident.span,
            Expr::Num { span, .. } | Expr::Unary { span, .. } | Expr::Binary { span, .. } => *span,
        }
    }
}

/// Literal value with its integer-or-real flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// `div`: truncating integer division
    IntDiv,
    /// `/`: real division
    FloatDiv,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::IntDiv => "div",
            BinaryOp::FloatDiv => "/",
        }
    }

    /// True for the operators parsed by `term` rather than `expr`
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, BinaryOp::Mul | BinaryOp::IntDiv | BinaryOp::FloatDiv)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Neg,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
        }
    }
}
