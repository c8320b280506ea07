//! minipas: a front end and interpreter for a small Pascal subset
//!
//! Programs consist of a name, `var` declarations of `integer` or `real`
//! variables, nested procedure declarations, and a compound body of
//! assignments over arithmetic expressions.
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Parser → AST → Semantic Analyzer → Interpreter → Store
//!                              ↘ Renderer / Annotator
//! ```
//!
//! Each stage fails fast with a [`CompileError`].
//!
//! # Example
//!
//! ```pascal
//! program Main;
//! var a, b : integer;
//! begin
//!     a := 10;
//!     b := a + 5
//! end.
//! ```

pub mod ast;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod resolve;

pub use diagnostics::{CompileError, ErrorCode, Result, SourceFile};

pub use ast::Program;
pub use config::Config;
pub use interp::{RuntimeStore, Value};
pub use resolve::Analysis;

/// Compiler version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a successful run produces
#[derive(Debug)]
pub struct Execution {
    pub program: Program,
    pub analysis: Analysis,
    pub store: RuntimeStore,
    /// Lines the interpreter emitted, starting with `NAME:`
    pub output: Vec<String>,
}

/// Parse source into an AST
pub fn parse(source: &str) -> Result<Program> {
    parser::parse(source)
}

/// Parse and validate names without executing anything
pub fn check(source: &str) -> Result<(Program, Analysis)> {
    let program = parser::parse(source)?;
    let analysis = resolve::analyze(&program)?;
    tracing::info!("Checked program {}", program.name.name);
    Ok((program, analysis))
}

/// Parse, validate and interpret a program
pub fn run(source: &str) -> Result<Execution> {
    let (program, analysis) = check(source)?;
    let mut interpreter = interp::Interpreter::new();
    interpreter.interpret(&program)?;
    let output = interpreter.get_output().to_vec();
    Ok(Execution {
        program,
        analysis,
        store: interpreter.into_store(),
        output,
    })
}
