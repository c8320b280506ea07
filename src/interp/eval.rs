//! Tree-walking interpreter for the AST

use crate::ast::*;
use crate::diagnostics::{CompileError, Result};

use super::env::RuntimeStore;
use super::value::Value;

/// Tree-walking interpreter
#[derive(Debug)]
pub struct Interpreter {
    /// Variable store
    store: RuntimeStore,
    /// Output buffer for testing
    output: Vec<String>,
}

impl Interpreter {
    /// Create a new interpreter
    pub fn new() -> Self {
        Interpreter {
            store: RuntimeStore::new(),
            output: Vec::new(),
        }
    }

    /// Get captured output (for testing)
    pub fn get_output(&self) -> &[String] {
        &self.output
    }

    pub fn store(&self) -> &RuntimeStore {
        &self.store
    }

    pub fn into_store(self) -> RuntimeStore {
        self.store
    }

    /// Run a program that has already passed semantic analysis
    pub fn interpret(&mut self, program: &Program) -> Result<()> {
        tracing::info!("Running program {}", program.name.name);
        self.output.push(format!("{}:", program.name.name));
        self.eval_block(&program.block)
    }

    fn eval_block(&mut self, block: &Block) -> Result<()> {
        for decl in &block.declarations {
            match decl {
                // Storage is created by the first assignment, and there is no
                // call statement that could enter a procedure body
                Decl::Var(_) | Decl::Procedure(_) => {}
            }
        }
        self.eval_compound(&block.body)
    }

    fn eval_compound(&mut self, compound: &Compound) -> Result<()> {
        for stmt in &compound.statements {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Compound(compound) => self.eval_compound(compound),
            Stmt::Assign(assign) => {
                let value = self.eval_expr(&assign.value)?;
                tracing::trace!(var = %assign.target.name, %value, "assign");
                self.store.set(&assign.target.name, value);
                Ok(())
            }
            Stmt::NoOp => Ok(()),
        }
    }

    /// Evaluate an expression against the current store
    pub fn eval_expr(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Num { value, .. } => Ok(Value::from(*value)),
            Expr::Var(ident) => {
                self.store
                    .get(&ident.name)
                    .ok_or_else(|| CompileError::UndefinedVariable {
                        name: ident.name.clone(),
                        span: ident.span.into(),
                    })
            }
            Expr::Unary { op, expr, span } => self.eval_expr(expr)?.unary(*op, *span),
            Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                lhs.binary(*op, rhs, *span)
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
