//! Tree-walking interpreter
//!
//! Executes a validated AST directly against a flat variable store.

pub mod env;
pub mod eval;
pub mod value;

pub use env::RuntimeStore;
pub use eval::Interpreter;
pub use value::Value;

use crate::diagnostics::Result;

/// Evaluate a bare arithmetic expression with an empty store
pub fn evaluate_expression(source: &str) -> Result<Value> {
    let expr = crate::parser::parse_expression(source)?;
    Interpreter::new().eval_expr(&expr)
}
