//! Source printers
//!
//! [`render_program`] turns an AST back into canonical source: reserved words
//! in lower case, names as the lexer normalized them, one declaration or
//! statement per line, and only the parentheses precedence requires. Parsing
//! the output yields the same tree (up to spans).
//!
//! [`annotate`] prints the same layout but tags every name with the level of
//! the scope that declares it.

mod annotate;

pub use annotate::annotate;

use std::convert::Infallible;

use crate::ast::*;

/// Layout knobs shared by both printers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

/// Print a program as canonical source
pub fn render_program(program: &Program, options: &RenderOptions) -> String {
    let mut writer = Writer::new(options.indent);
    writer.line(0, &format!("program {};", program.name.name));
    writer.block(&program.block, 0);
    writer
        .compound(&program.block.body, 0, ".", &mut Plain)
        .unwrap_or_else(|never| match never {});
    writer.finish()
}

/// Print a single expression
pub fn render_expr(expr: &Expr) -> String {
    expr_source(expr, &mut Plain).unwrap_or_else(|never| match never {})
}

/// Spelling of variable references
pub(crate) trait Names {
    type Error;

    fn reference(&mut self, ident: &Ident) -> Result<String, Self::Error>;
}

/// Names exactly as stored in the tree
struct Plain;

impl Names for Plain {
    type Error = Infallible;

    fn reference(&mut self, ident: &Ident) -> Result<String, Infallible> {
        Ok(ident.name.clone())
    }
}

/// Line-oriented output buffer
pub(crate) struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    pub(crate) fn new(indent: usize) -> Self {
        Self {
            out: String::new(),
            indent,
        }
    }

    pub(crate) fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth * self.indent {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    /// Declarations only; the caller prints the body so it can pick the
    /// terminator after `end`
    fn block(&mut self, block: &Block, depth: usize) {
        let mut in_var_section = false;
        for decl in &block.declarations {
            match decl {
                Decl::Var(var) => {
                    if !in_var_section {
                        self.line(depth, "var");
                        in_var_section = true;
                    }
                    self.line(
                        depth + 1,
                        &format!("{} : {};", var.var.name, var.ty.kind.keyword()),
                    );
                }
                Decl::Procedure(procedure) => {
                    in_var_section = false;
                    let params = param_list(&procedure.params, |param| {
                        format!("{} : {}", param.var.name, param.ty.kind.keyword())
                    });
                    self.line(
                        depth,
                        &format!("procedure {}{};", procedure.name.name, params),
                    );
                    self.block(&procedure.block, depth + 1);
                    self.compound(&procedure.block.body, depth + 1, ";", &mut Plain)
                        .unwrap_or_else(|never| match never {});
                }
            }
        }
    }

    /// `begin`, the statements one level deeper, then `end` followed by
    /// `terminator`
    pub(crate) fn compound<N: Names>(
        &mut self,
        compound: &Compound,
        depth: usize,
        terminator: &str,
        names: &mut N,
    ) -> Result<(), N::Error> {
        self.line(depth, "begin");
        let last = compound.statements.len().saturating_sub(1);
        for (i, stmt) in compound.statements.iter().enumerate() {
            let separator = if i == last { "" } else { ";" };
            self.stmt(stmt, depth + 1, separator, names)?;
        }
        self.line(depth, &format!("end{}", terminator));
        Ok(())
    }

    fn stmt<N: Names>(
        &mut self,
        stmt: &Stmt,
        depth: usize,
        separator: &str,
        names: &mut N,
    ) -> Result<(), N::Error> {
        match stmt {
            Stmt::Compound(compound) => self.compound(compound, depth, separator, names),
            Stmt::Assign(assign) => {
                let target = names.reference(&assign.target)?;
                let value = expr_source(&assign.value, names)?;
                self.line(depth, &format!("{} := {}{}", target, value, separator));
                Ok(())
            }
            // A trailing empty statement leaves no trace; an inner one keeps
            // its separator so the statement count survives a reparse
            Stmt::NoOp => {
                if !separator.is_empty() {
                    self.line(depth, separator);
                }
                Ok(())
            }
        }
    }
}

/// `(A : integer; B : real)`, or nothing when there are no parameters
pub(crate) fn param_list(params: &[Param], mut each: impl FnMut(&Param) -> String) -> String {
    if params.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = params.iter().map(&mut each).collect();
    format!("({})", parts.join("; "))
}

/// Binding strength: additive < multiplicative < unary and atoms
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary { op, .. } if op.is_multiplicative() => 2,
        Expr::Binary { .. } => 1,
        Expr::Var(_) | Expr::Num { .. } | Expr::Unary { .. } => 3,
    }
}

pub(crate) fn expr_source<N: Names>(expr: &Expr, names: &mut N) -> Result<String, N::Error> {
    Ok(match expr {
        Expr::Var(ident) => names.reference(ident)?,
        Expr::Num { value, .. } => number_source(*value),
        Expr::Unary { op, expr, .. } => {
            let operand = expr_source(expr, names)?;
            if matches!(**expr, Expr::Binary { .. }) {
                format!("{}({})", op.as_str(), operand)
            } else {
                format!("{}{}", op.as_str(), operand)
            }
        }
        Expr::Binary {
            op, left, right, ..
        } => {
            let level = precedence(expr);
            let mut lhs = expr_source(left, names)?;
            if precedence(left) < level {
                lhs = format!("({})", lhs);
            }
            // Operators are left-associative, so an equal-strength right
            // operand needs parentheses
            let mut rhs = expr_source(right, names)?;
            if precedence(right) <= level {
                rhs = format!("({})", rhs);
            }
            format!("{} {} {}", lhs, op.as_str(), rhs)
        }
    })
}

/// Literal text that lexes back to the same kind of number
fn number_source(value: Number) -> String {
    match value {
        Number::Integer(n) => n.to_string(),
        Number::Real(r) => {
            let text = r.to_string();
            if text.contains('.') {
                text
            } else {
                format!("{}.0", text)
            }
        }
    }
}
