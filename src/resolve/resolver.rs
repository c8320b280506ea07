//! Semantic analysis pass
//!
//! Walks the AST once, building the scope chain and validating every
//! declaration and reference. No arithmetic happens here.

use super::symbols::*;
use crate::ast::*;
use crate::diagnostics::{CompileError, ErrorCode, Result};
use crate::lexer::{Token, TokenKind, TokenValue};
use std::fmt;

/// Name given to the outermost scope
pub const GLOBAL_SCOPE: &str = "global";

/// Scope entry or exit, in traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeEvent {
    Enter(ScopeId),
    Leave(ScopeId),
}

/// Outcome of a successful analysis
#[derive(Debug)]
pub struct Analysis {
    pub scopes: ScopeTree,
    pub global: ScopeId,
    pub events: Vec<ScopeEvent>,
}

impl Analysis {
    /// `ENTER scope: NAME` / `LEAVE scope: NAME` lines
    pub fn trace(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|event| match *event {
                ScopeEvent::Enter(id) => format!("ENTER scope: {}", self.scopes.get(id).name),
                ScopeEvent::Leave(id) => format!("LEAVE scope: {}", self.scopes.get(id).name),
            })
            .collect()
    }

    /// Trace lines with each scope's table printed just before it is left
    pub fn report(&self) -> String {
        self.to_string()
    }

    /// Scope created for the procedure (or `global`) with this name
    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.find(name)
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            match *event {
                ScopeEvent::Enter(id) => {
                    writeln!(f, "ENTER scope: {}", self.scopes.get(id).name)?;
                }
                ScopeEvent::Leave(id) => {
                    writeln!(f, "{}", self.scopes.dump(id))?;
                    writeln!(f)?;
                    writeln!(f, "LEAVE scope: {}", self.scopes.get(id).name)?;
                }
            }
        }
        Ok(())
    }
}

/// Validate names in a program
pub fn analyze(program: &Program) -> Result<Analysis> {
    SemanticAnalyzer::new().analyze(program)
}

/// Name validator
pub struct SemanticAnalyzer {
    scopes: ScopeTree,
    events: Vec<ScopeEvent>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeTree::new(),
            events: Vec::new(),
        }
    }

    /// Analyze the whole program, failing on the first error
    pub fn analyze(mut self, program: &Program) -> Result<Analysis> {
        let global = self.enter_scope(GLOBAL_SCOPE, None);
        self.visit_block(&program.block, global)?;
        self.leave_scope(global);

        tracing::info!(
            "Analyzed program {} ({} scopes)",
            program.name.name,
            self.scopes.len()
        );

        Ok(Analysis {
            scopes: self.scopes,
            global,
            events: self.events,
        })
    }

    fn enter_scope(&mut self, name: &str, enclosing: Option<ScopeId>) -> ScopeId {
        let id = self.scopes.push(name, enclosing);
        tracing::debug!("ENTER scope: {}", name);
        self.events.push(ScopeEvent::Enter(id));
        id
    }

    fn leave_scope(&mut self, id: ScopeId) {
        tracing::debug!("LEAVE scope: {}", self.scopes.get(id).name);
        self.events.push(ScopeEvent::Leave(id));
    }

    fn visit_block(&mut self, block: &Block, scope: ScopeId) -> Result<()> {
        for decl in &block.declarations {
            match decl {
                Decl::Var(var) => self.visit_var_decl(var, scope)?,
                Decl::Procedure(proc) => self.visit_procedure(proc, scope)?,
            }
        }
        self.visit_compound(&block.body, scope)
    }

    fn visit_var_decl(&mut self, decl: &VarDecl, scope: ScopeId) -> Result<()> {
        let ty = self.resolve_type(&decl.ty, scope)?;

        if self.scopes.lookup(scope, &decl.var.name, true).is_some() {
            return Err(CompileError::semantic(
                ErrorCode::DuplicateId,
                Token::ident(&decl.var.name, decl.var.span),
            ));
        }

        self.scopes
            .define(scope, Symbol::variable(&decl.var.name, ty, decl.var.span));
        Ok(())
    }

    fn visit_procedure(&mut self, decl: &ProcedureDecl, enclosing: ScopeId) -> Result<()> {
        let params: Vec<Symbol> = decl
            .params
            .iter()
            .map(|p| Symbol::variable(&p.var.name, p.ty.name(), p.var.span))
            .collect();

        // Visible to siblings and to its own body
        self.scopes.define(
            enclosing,
            Symbol::procedure(&decl.name.name, params.clone(), decl.name.span),
        );

        let scope = self.enter_scope(&decl.name.name, Some(enclosing));
        for (param, symbol) in decl.params.iter().zip(params) {
            self.resolve_type(&param.ty, scope)?;
            self.scopes.define(scope, symbol);
        }
        self.visit_block(&decl.block, scope)?;
        self.leave_scope(scope);
        Ok(())
    }

    /// Name of the type symbol a type annotation resolves to
    fn resolve_type(&self, ty: &TypeSpec, scope: ScopeId) -> Result<String> {
        match self.scopes.lookup(scope, ty.name(), false) {
            Some(symbol) => Ok(symbol.name.clone()),
            None => {
                let kind = match ty.kind {
                    TypeKind::Integer => TokenKind::Integer,
                    TypeKind::Real => TokenKind::Real,
                };
                let token = Token::new(
                    kind,
                    Some(TokenValue::Text(ty.name().to_string())),
                    ty.span,
                );
                Err(CompileError::semantic(ErrorCode::IdNotFound, token))
            }
        }
    }

    fn visit_compound(&mut self, compound: &Compound, scope: ScopeId) -> Result<()> {
        for stmt in &compound.statements {
            self.visit_stmt(stmt, scope)?;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &Stmt, scope: ScopeId) -> Result<()> {
        match stmt {
            Stmt::Compound(compound) => self.visit_compound(compound, scope),
            Stmt::Assign(assign) => {
                self.check_reference(&assign.target, scope)?;
                self.visit_expr(&assign.value, scope)
            }
            Stmt::NoOp => Ok(()),
        }
    }

    fn visit_expr(&mut self, expr: &Expr, scope: ScopeId) -> Result<()> {
        match expr {
            Expr::Var(ident) => self.check_reference(ident, scope),
            Expr::Num { .. } => Ok(()),
            Expr::Unary { expr, .. } => self.visit_expr(expr, scope),
            Expr::Binary { left, right, .. } => {
                self.visit_expr(left, scope)?;
                self.visit_expr(right, scope)
            }
        }
    }

    fn check_reference(&self, ident: &Ident, scope: ScopeId) -> Result<()> {
        if self.scopes.lookup(scope, &ident.name, false).is_none() {
            return Err(CompileError::semantic(
                ErrorCode::IdNotFound,
                Token::ident(&ident.name, ident.span),
            ));
        }
        Ok(())
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
